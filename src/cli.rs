//! CLI argument parsing for hotelstat

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "hotelstat")]
#[command(version)]
#[command(about = "Statistical tests and business metrics for hotel booking data", long_about = None)]
pub struct Cli {
    /// Analysis configuration (TOML); the built-in hotel bookings schema is used when absent
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chi-square association between two categorical columns
    Associate {
        /// Bookings file (delimited text with a header row)
        data: PathBuf,
        var1: String,
        var2: String,
    },

    /// Compare a numeric column between two groups
    Compare {
        data: PathBuf,
        /// Numeric column to compare
        #[arg(long = "value", value_name = "COLUMN")]
        value: String,
        /// Grouping column
        #[arg(long = "group", value_name = "COLUMN")]
        group: String,
        /// First group label
        first: String,
        /// Second group label
        second: String,
    },

    /// One-way ANOVA of a numeric column across every group
    Anova {
        data: PathBuf,
        #[arg(long = "value", value_name = "COLUMN")]
        value: String,
        #[arg(long = "group", value_name = "COLUMN")]
        group: String,
    },

    /// Cancellation rate by one or more grouping columns
    Metrics {
        data: PathBuf,
        /// Grouping columns (e.g., --by hotel --by market_segment)
        #[arg(long = "by", value_name = "COLUMN", required = true)]
        by: Vec<String>,
        /// Binary outcome column (default: configured outcome role)
        #[arg(long = "outcome", value_name = "COLUMN")]
        outcome: Option<String>,
        /// Confidence level for the intervals (default: from config)
        #[arg(long = "confidence", value_name = "LEVEL")]
        confidence: Option<f64>,
    },

    /// Rank features by association with a binary target
    Importance {
        data: PathBuf,
        /// Target column (default: from config)
        #[arg(long = "target", value_name = "COLUMN")]
        target: Option<String>,
        /// Comma-separated features (default: from config)
        #[arg(long = "features", value_name = "LIST", value_delimiter = ',')]
        features: Vec<String>,
    },

    /// Business metrics snapshot
    Summary { data: PathBuf },

    /// Data quality profile of every column
    Profile { data: PathBuf },

    /// Confidence interval for a proportion
    Ci {
        successes: u64,
        total: u64,
        #[arg(long = "confidence", value_name = "LEVEL", default_value = "0.95")]
        confidence: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_associate() {
        let cli = Cli::parse_from([
            "hotelstat",
            "associate",
            "bookings.csv",
            "deposit_type",
            "is_canceled",
        ]);
        match cli.command {
            Command::Associate { data, var1, var2 } => {
                assert_eq!(data, PathBuf::from("bookings.csv"));
                assert_eq!(var1, "deposit_type");
                assert_eq!(var2, "is_canceled");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "hotelstat",
            "summary",
            "bookings.csv",
            "--format",
            "json",
            "--debug",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_compare_flags() {
        let cli = Cli::parse_from([
            "hotelstat",
            "compare",
            "bookings.csv",
            "--value",
            "adr",
            "--group",
            "hotel",
            "City Hotel",
            "Resort Hotel",
        ]);
        assert!(matches!(
            cli.command,
            Command::Compare { ref first, ref second, .. }
                if first == "City Hotel" && second == "Resort Hotel"
        ));
    }

    #[test]
    fn test_cli_metrics_multiple_groups() {
        let cli = Cli::parse_from([
            "hotelstat",
            "metrics",
            "bookings.csv",
            "--by",
            "hotel",
            "--by",
            "deposit_type",
        ]);
        match cli.command {
            Command::Metrics { by, outcome, .. } => {
                assert_eq!(by, vec!["hotel", "deposit_type"]);
                assert!(outcome.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_importance_feature_list() {
        let cli = Cli::parse_from([
            "hotelstat",
            "importance",
            "bookings.csv",
            "--features",
            "lead_time,deposit_type",
        ]);
        match cli.command {
            Command::Importance { features, target, .. } => {
                assert_eq!(features, vec!["lead_time", "deposit_type"]);
                assert!(target.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_ci_default_confidence() {
        let cli = Cli::parse_from(["hotelstat", "ci", "30", "100"]);
        assert!(matches!(
            cli.command,
            Command::Ci { successes: 30, total: 100, confidence } if confidence == 0.95
        ));
    }

    #[test]
    fn test_cli_metrics_requires_group() {
        assert!(Cli::try_parse_from(["hotelstat", "metrics", "bookings.csv"]).is_err());
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from([
            "hotelstat",
            "--config",
            "analysis.toml",
            "profile",
            "bookings.csv",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("analysis.toml")));
    }
}
