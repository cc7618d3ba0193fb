use clap::{Parser, Subcommand};

/// Command-line interface definition for geoattend
/// Location-gated attendance bot with a CSV record store
#[derive(Parser)]
#[command(
    name = "geoattend",
    version = env!("CARGO_PKG_VERSION"),
    about = "A location-gated attendance bot: check in and out from a chat, verified against a geofence",
    long_about = None
)]
pub struct Cli {
    /// Override configuration file path (useful for tests or several bots)
    #[arg(global = true, long = "config")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configuration file with default values
    Init,

    /// Inspect or update the configuration file
    Config {
        #[arg(long = "print", help = "Print the effective configuration")]
        print_config: bool,

        #[arg(long = "check", help = "List keys missing from the configuration file")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing keys with their default values")]
        migrate: bool,
    },

    /// Start the bot: long-poll the chat transport and run the periodic export
    Run,

    /// Print attendance records from the store
    List {
        #[arg(long = "today", help = "Show only today's records", conflicts_with = "date")]
        today: bool,

        #[arg(long = "date", help = "Show only records of this day (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "user", help = "Show only records of this user id")]
        user: Option<String>,
    },

    /// Distance from a position to the configured target
    Distance {
        /// Latitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        latitude: f64,

        /// Longitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
    },
}
