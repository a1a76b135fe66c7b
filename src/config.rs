//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::tasks::RuntimeOptions;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "decagone-timer")]
#[command(about = "An audio-synchronized countdown timer with a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20600")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Interval between media position updates, in milliseconds
    #[arg(long, default_value = "250", value_parser = clap::value_parser!(u64).range(10..=5000))]
    pub timeupdate_ms: u64,

    /// Reject the first play request, as a browser autoplay policy would
    #[arg(long)]
    pub autoplay_blocked: bool,

    /// Expose the developer time-jump endpoints
    #[arg(long, env = "DECAGONE_DEV", value_parser = clap::builder::BoolishValueParser::new())]
    pub dev: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Options for the controller runtime
    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            timeupdate_period: Duration::from_millis(self.timeupdate_ms),
            autoplay_blocked: self.autoplay_blocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["decagone-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20600");
        assert_eq!(config.log_level(), "info");
        assert!(!config.autoplay_blocked);

        let options = config.runtime_options();
        assert_eq!(options.timeupdate_period, Duration::from_millis(250));
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "decagone-timer",
            "--dev",
            "--autoplay-blocked",
            "--timeupdate-ms",
            "100",
            "-v",
        ])
        .unwrap();
        assert!(config.dev);
        assert!(config.autoplay_blocked);
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.runtime_options().timeupdate_period, Duration::from_millis(100));
    }

    #[test]
    fn test_dev_flag_from_environment() {
        std::env::set_var("DECAGONE_DEV", "1");
        let enabled = Config::try_parse_from(["decagone-timer"]).map(|config| config.dev);
        std::env::set_var("DECAGONE_DEV", "no");
        let disabled = Config::try_parse_from(["decagone-timer"]).map(|config| config.dev);
        std::env::remove_var("DECAGONE_DEV");

        assert!(enabled.unwrap());
        assert!(!disabled.unwrap());
    }

    #[test]
    fn test_timeupdate_range() {
        assert!(Config::try_parse_from(["decagone-timer", "--timeupdate-ms", "1"]).is_err());
    }
}
