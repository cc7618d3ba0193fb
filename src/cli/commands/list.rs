use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::store::RecordStore;
use crate::ui::messages::{info, warning};
use crate::utils::date::{iso_date, parse_date};
use crate::utils::table::Table;
use crate::utils::{Clock, SystemClock};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config, config_path: &Path) -> AppResult<()> {
    if let Commands::List { today, date, user } = cmd {
        let offset = cfg.offset()?;
        let store = RecordStore::new(cfg.records_path(config_path), offset);

        let day = if *today {
            Some(iso_date(&SystemClock::new(offset).now()))
        } else if let Some(d) = date {
            let parsed = parse_date(d).ok_or_else(|| AppError::InvalidDate(d.to_string()))?;
            Some(parsed.format("%Y-%m-%d").to_string())
        } else {
            None
        };

        let scan = match &day {
            Some(d) => store.scan_by_date_prefix(d),
            None => store.scan_all(),
        };
        let scan = match scan {
            Err(AppError::StoreMissing(p)) => {
                info(format!("No records yet ({p} does not exist)."));
                return Ok(());
            }
            other => other?,
        };

        let mut table = Table::new(&crate::models::record::HEADER);
        for r in scan
            .records
            .iter()
            .filter(|r| user.as_ref().is_none_or(|u| &r.subject_id == u))
        {
            table.add_row(r.to_row().to_vec());
        }

        if table.is_empty() {
            info("No records found.");
        } else {
            print!("{}", table.render());
        }

        if scan.skipped > 0 {
            warning(format!("{} malformed row(s) skipped.", scan.skipped));
        }
    }
    Ok(())
}
