//! Kiosk configuration module

use std::path::PathBuf;

use clap::Parser;

use crate::{config::logging::LoggingConfig, recorder::DEFAULT_ORDERS_FILE};

pub mod logging;

pub use logging::LogFormat;

/// Rushmore kiosk configuration
///
/// Every setting is optional. With no flags and no environment the kiosk
/// keeps its order log in `pizza_orders.json` in the working directory,
/// draws a random Pizza of the Day and logs warnings to stderr; the kiosk
/// screen itself never asks for any of these.
#[derive(Debug, Parser)]
#[command(name = "rushmore", about = "RushMore Pizzeria ordering kiosk", long_about = None)]
pub struct Config {
    /// Order log file
    #[arg(long, env = "RUSHMORE_ORDERS_FILE", default_value = DEFAULT_ORDERS_FILE)]
    pub orders_file: PathBuf,

    /// Seed for drawing the Pizza of the Day; drawn from OS entropy when omitted
    #[arg(long, env = "RUSHMORE_SEED")]
    pub seed: Option<u64>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_the_house_setup() -> TestResult {
        let config = Config::try_parse_from(["rushmore"])?;

        assert_eq!(config.orders_file, Path::new("pizza_orders.json"));
        assert_eq!(config.seed, None);
        assert!(matches!(config.logging.log_format, LogFormat::Compact));

        Ok(())
    }

    #[test]
    fn flags_override_defaults() -> TestResult {
        let config = Config::try_parse_from([
            "rushmore",
            "--orders-file",
            "/tmp/orders.json",
            "--seed",
            "42",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ])?;

        assert_eq!(config.orders_file, Path::new("/tmp/orders.json"));
        assert_eq!(config.seed, Some(42));
        assert!(matches!(config.logging.log_format, LogFormat::Json));
        assert_eq!(config.logging.log_level, "debug");

        Ok(())
    }

    #[test]
    fn seed_must_be_a_number() {
        assert!(Config::try_parse_from(["rushmore", "--seed", "tuesday"]).is_err());
    }
}
