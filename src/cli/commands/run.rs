use crate::bot::Bot;
use crate::config::{Config, TOKEN_ENV};
use crate::errors::{AppError, AppResult};
use crate::export::ExportTask;
use crate::store::{JsonSessionStore, RecordStore};
use crate::telemetry;
use crate::transport::telegram::RawUpdate;
use crate::transport::{Messenger, TelegramClient};
use crate::utils::{Clock, SystemClock};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Pause after a failed `getUpdates` before polling again.
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Handle the `run` command: blocks until Ctrl-C.
pub fn handle(cfg: &Config, config_path: &Path) -> AppResult<()> {
    telemetry::init_logging();

    let token = cfg.bot_token.clone().ok_or_else(|| {
        AppError::Config(format!(
            "no bot token: set bot_token in {} or the {TOKEN_ENV} environment variable",
            config_path.display()
        ))
    })?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(cfg.clone(), config_path, &token))
}

async fn serve(cfg: Config, config_path: &Path, token: &str) -> AppResult<()> {
    let offset = cfg.offset()?;
    let records_path = cfg.records_path(config_path);
    let sessions_path = cfg.sessions_path(config_path);
    let poll_timeout = cfg.poll_timeout_secs;

    let cfg = Arc::new(cfg);
    let client = Arc::new(TelegramClient::new(&cfg.api_base_url, token, poll_timeout)?);
    let messenger: Arc<dyn Messenger> = client.clone();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(offset));
    let store = RecordStore::new(&records_path, offset);
    let sessions = Arc::new(JsonSessionStore::open(&sessions_path)?);

    match client.get_me().await {
        Ok(me) => info!(bot = %me["username"].as_str().unwrap_or("?"), "connected to bot api"),
        Err(e) => warn!(error = %e, "getMe failed, polling anyway"),
    }
    if cfg.admin_id.is_none() {
        warn!("admin_id not configured: admin commands, notifications and exports are disabled");
    }
    info!(
        records = %records_path.display(),
        sessions = %sessions_path.display(),
        target = %cfg.target,
        radius_m = cfg.max_distance_meters,
        "bot starting"
    );

    let export = ExportTask::new(cfg.clone(), store.clone(), messenger.clone(), clock.clone()).start();
    let bot = Bot::new(cfg, store, sessions, messenger, clock);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
        info!("shutdown requested");
    };
    poll_updates(&bot, |offset| client.get_updates(offset, poll_timeout), shutdown).await;

    export.stop().await;
    info!("bot stopped");
    Ok(())
}

/// Long-poll loop: fetch a batch after the last seen update id and hand each
/// update to the bot in order, until `shutdown` resolves.
///
/// `shutdown` is one future for the whole run and is checked before every
/// fetch, so a signal that arrives while a batch is handled ends the loop as
/// soon as that batch is done.
pub async fn poll_updates<F, Fut, S>(bot: &Bot, mut fetch: F, shutdown: S)
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = AppResult<Vec<RawUpdate>>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut next_offset: i64 = 0;
    loop {
        let batch = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            batch = fetch(next_offset) => batch,
        };

        let updates = match batch {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "getUpdates failed");
                tokio::select! {
                    biased;
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(RETRY_DELAY) => continue,
                }
            }
        };

        // strictly sequential: one conversation's events keep their order
        for raw in updates {
            next_offset = next_offset.max(raw.update_id + 1);
            let Some(update) = raw.into_update() else {
                continue;
            };
            let chat_id = update.chat_id();
            if let Err(e) = bot.handle(update).await {
                error!(chat_id, error = %e, "update handling failed");
            }
        }
    }
}
