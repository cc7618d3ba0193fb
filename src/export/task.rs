use crate::bot::texts;
use crate::config::Config;
use crate::errors::AppError;
use crate::store::RecordStore;
use crate::transport::Messenger;
use crate::utils::Clock;
use crate::utils::date::format_timestamp;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// What a single export tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    AdminNotConfigured,
    StoreEmpty,
    Sent,
    Failed,
}

/// Sends the full store to the administrator every `export_interval_secs`.
pub struct ExportTask {
    cfg: Arc<Config>,
    store: RecordStore,
    messenger: Arc<dyn Messenger>,
    clock: Arc<dyn Clock>,
}

impl ExportTask {
    pub fn new(
        cfg: Arc<Config>,
        store: RecordStore,
        messenger: Arc<dyn Messenger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cfg,
            store,
            messenger,
            clock,
        }
    }

    /// One tick. Never fails: delivery errors are logged and reported as `Failed`.
    pub async fn export_once(&self) -> ExportOutcome {
        let Some(admin) = self.cfg.admin_id else {
            debug!("admin_id not configured, periodic export skipped");
            return ExportOutcome::AdminNotConfigured;
        };

        if !self.store.has_content() {
            debug!(path = %self.store.path().display(), "record store empty, periodic export skipped");
            return ExportOutcome::StoreEmpty;
        }

        let bytes = match self.store.read_bytes() {
            Ok(b) => b,
            Err(e) => {
                error!("{}", AppError::ExportDeliveryFailed(e.to_string()));
                return ExportOutcome::Failed;
            }
        };

        let file_name = self.store.file_name();
        let caption = texts::backup_caption(&format_timestamp(&self.clock.now()));

        match self
            .messenger
            .send_document(admin, &file_name, bytes, Some(&caption))
            .await
        {
            Ok(()) => {
                info!(admin, "periodic export sent");
                ExportOutcome::Sent
            }
            Err(e) => {
                error!(admin, "{}", AppError::ExportDeliveryFailed(e.to_string()));
                ExportOutcome::Failed
            }
        }
    }

    /// Spawn the loop on the current tokio runtime.
    pub fn start(self) -> ExportHandle {
        let interval = Duration::from_secs(self.cfg.export_interval_secs);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let join = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "periodic export started");
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = tokio::time::sleep(interval) => {
                        let outcome = self.export_once().await;
                        debug!(?outcome, "periodic export tick");
                    }
                }
            }
            info!("periodic export stopped");
        });

        ExportHandle {
            stop: Some(stop_tx),
            join,
        }
    }
}

/// Owner of the running export loop. Dropping it also ends the loop.
pub struct ExportHandle {
    stop: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl ExportHandle {
    pub fn is_running(&self) -> bool {
        !self.join.is_finished()
    }

    /// Signal the loop and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.join.await {
            error!(error = %e, "periodic export task ended abnormally");
        }
    }
}
