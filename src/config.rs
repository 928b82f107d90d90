//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Result output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tables for people.
    Table,

    /// JSON for programs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Compact,
        global = true
    )]
    pub log_format: LogFormat,
}

/// Coupon selection from YAML fixtures
#[derive(Debug, Parser)]
#[command(name = "coupons", about = "Find the best coupon for a cart", long_about = None)]
pub struct Config {
    /// Directory holding `coupons/`, `users/`, `carts/` and `usage/` fixture sets
    #[arg(
        short,
        long,
        env = "COUPONS_FIXTURES_DIR",
        default_value = "./fixtures",
        global = true
    )]
    pub fixtures_dir: PathBuf,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Fixture set and point in time shared by the evaluating commands.
#[derive(Debug, Args)]
pub struct EvaluationArgs {
    /// Fixture set name
    #[arg(short, long, default_value = "default")]
    pub set: String,

    /// User key in the users fixture
    #[arg(short, long)]
    pub user: String,

    /// Cart key in the carts fixture
    #[arg(short, long)]
    pub cart: String,

    /// Evaluate as of this RFC 3339 timestamp instead of the current time
    #[arg(short, long)]
    pub now: Option<Timestamp>,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select the best coupon for a user and cart
    Best {
        /// Fixture set, user, cart and time
        #[command(flatten)]
        evaluation: EvaluationArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the active coupons in a fixture set, newest first
    List {
        /// Fixture set name
        #[arg(short, long, default_value = "default")]
        set: String,
    },

    /// Show why each active coupon is or is not eligible
    Explain {
        /// Fixture set, user, cart and time
        #[command(flatten)]
        evaluation: EvaluationArgs,
    },
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
    use clap::CommandFactory;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Config::command().debug_assert();
    }

    #[test]
    fn best_parses_evaluation_args() -> TestResult {
        let config = Config::try_parse_from([
            "coupons",
            "--fixtures-dir",
            "/tmp/fixtures",
            "best",
            "--user",
            "loyal",
            "--cart",
            "big",
            "--now",
            "2024-06-01T12:00:00Z",
            "--format",
            "json",
        ])?;

        assert_eq!(config.fixtures_dir, PathBuf::from("/tmp/fixtures"));

        let Command::Best { evaluation, format } = config.command else {
            return Err("expected the best command".into());
        };

        assert_eq!(evaluation.set, "default");
        assert_eq!(evaluation.user, "loyal");
        assert_eq!(evaluation.cart, "big");
        assert_eq!(evaluation.now, Some("2024-06-01T12:00:00Z".parse()?));
        assert_eq!(format, OutputFormat::Json);

        Ok(())
    }

    #[test]
    fn list_defaults_to_default_set() -> TestResult {
        let config = Config::try_parse_from(["coupons", "list", "--log-format", "json"])?;

        assert_eq!(config.logging.log_format, LogFormat::Json);
        assert!(matches!(config.command, Command::List { set } if set == "default"));

        Ok(())
    }

    #[test]
    fn explain_requires_user_and_cart() {
        assert!(Config::try_parse_from(["coupons", "explain", "--user", "loyal"]).is_err());
    }
}
