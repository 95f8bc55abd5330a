//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Umbra - a total solar eclipse in your terminal
#[derive(Debug, Parser)]
#[command(
    name = "umbra",
    about = "Watch a total solar eclipse unfold in the terminal",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/umbra/logs/umbra.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute; defaults to `play`
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play the eclipse animation (default)
    Play {
        /// Start paused at the beginning
        #[arg(long)]
        paused: bool,

        /// Skip the caption request and use the built-in captions
        #[arg(long)]
        offline: bool,
    },

    /// Print phase and visual parameters for one progress value
    Inspect {
        /// Progress in [0, 1]
        #[arg(value_name = "PROGRESS", allow_negative_numbers = true)]
        progress: f64,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the six phases with their progress ranges
    Phases {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Fetch captions once and print them
    Narrate {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for inspection commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("umbra")
        .join("logs")
        .join("umbra.log")
}
