//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "pomodoro")]
#[command(about = "A Pomodoro interval timer with round and goal tracking")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Print snapshots as JSON lines
    #[arg(short, long)]
    pub json: bool,

    /// Only print when the timer starts, stops or completes a round
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["pomodoro"]).unwrap();
        assert!(!config.json);
        assert!(!config.quiet);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn test_short_flags() {
        let config = Config::try_parse_from(["pomodoro", "-j", "-q", "-v"]).unwrap();
        assert!(config.json);
        assert!(config.quiet);
        assert_eq!(config.log_level(), "debug");
    }
}
