use crate::pump::{
    create_backoff_policy, BackoffPolicy, ExponentialBackoff, LinearBackoff, PumpConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Manage a book catalog stored in memory, CSV or JSON
#[derive(Parser, Debug)]
#[command(name = "rust-book-catalog")]
#[command(about = "Manage a book catalog stored in memory, CSV or JSON", long_about = None)]
pub struct CliArgs {
    /// Storage backend for the catalog
    #[arg(
        long = "store",
        value_name = "STORE",
        default_value = "csv",
        global = true,
        help = "Storage backend: 'memory', 'csv' or 'json'"
    )]
    pub store: StoreKind,

    /// Backing file for the csv and json stores
    #[arg(
        long = "path",
        value_name = "FILE",
        default_value = "books.csv",
        global = true,
        help = "Path of the catalog file (ignored by the memory store)"
    )]
    pub path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Catalog operations
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every book as CSV
    List,

    /// Show one book
    Show {
        /// Book id
        id: i32,
    },

    /// Register a new book
    Add {
        #[arg(long)]
        id: i32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        year: i32,
    },

    /// Change the title of a book
    UpdateTitle {
        /// Book id
        id: i32,
        /// New title
        title: String,
    },

    /// Remove a book
    Remove {
        /// Book id
        id: i32,
    },

    /// Books whose author contains TEXT, ignoring case
    FindAuthor {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Books whose title contains TEXT, ignoring case
    FindTitle {
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Import books from a CSV file into the store, retrying failed writes
    Import {
        /// CSV file to import
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Retries per book after a failed write
        #[arg(long = "max-retries", value_name = "N")]
        max_retries: Option<u32>,

        /// Growth curve of the delay between retries
        #[arg(long = "backoff", value_name = "KIND", default_value = "exponential")]
        backoff: BackoffKind,

        /// First retry delay (exponential) or per-retry increment (linear)
        #[arg(long = "base-delay-ms", value_name = "MS", default_value_t = 50)]
        base_delay_ms: u64,

        /// Upper bound for any retry delay (2000 for exponential, 1000 for linear)
        #[arg(long = "max-delay-ms", value_name = "MS")]
        max_delay_ms: Option<u64>,
    },
}

/// Available storage backends
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Memory,
    Csv,
    Json,
}

/// Available backoff curves
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackoffKind {
    Exponential,
    Linear,
}

impl CliArgs {
    /// Create a PumpConfig from the import arguments
    ///
    /// Falls back to `PumpConfig::default()` for anything not given on the
    /// command line, including when the command is not `import`.
    ///
    /// # Returns
    ///
    /// A `PumpConfig` with values from CLI arguments or defaults.
    pub fn to_pump_config(&self) -> PumpConfig {
        match &self.command {
            Command::Import {
                max_retries: Some(max_retries),
                ..
            } => PumpConfig {
                max_retries: *max_retries,
            },
            _ => PumpConfig::default(),
        }
    }

    /// Create the backoff policy selected by the import arguments
    ///
    /// Without `--max-delay-ms` the cap is the chosen curve's default. A
    /// maximum below the base delay is raised to the base delay.
    ///
    /// # Returns
    ///
    /// `None` when the command is not `import`.
    pub fn to_backoff_policy(&self) -> Option<Box<dyn BackoffPolicy>> {
        match &self.command {
            Command::Import {
                backoff,
                base_delay_ms,
                max_delay_ms,
                ..
            } => {
                let step = Duration::from_millis(*base_delay_ms);
                let max = match (max_delay_ms, backoff) {
                    (Some(ms), _) => Duration::from_millis(*ms),
                    (None, BackoffKind::Exponential) => ExponentialBackoff::default().max,
                    (None, BackoffKind::Linear) => LinearBackoff::default().max,
                }
                .max(step);
                Some(create_backoff_policy(*backoff, step, max))
            }
            _ => None,
        }
    }
}
