use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::geo;
use crate::models::Coordinate;
use crate::ui::messages::{success, warning};

/// Print the distance from a position to the configured target.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Distance {
        latitude,
        longitude,
    } = cmd
    {
        let position = Coordinate::checked(*latitude, *longitude)?;
        let check = geo::evaluate(position, cfg.target, cfg.max_distance_meters);

        let msg = format!(
            "{} → {}: {:.2} m (limit {:.2} m)",
            position, cfg.target, check.distance, check.threshold
        );
        if check.passed {
            success(format!("{msg}, inside the geofence"));
        } else {
            warning(format!("{msg}, outside the geofence"));
        }
    }
    Ok(())
}
