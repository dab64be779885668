//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Narrative Lens - Track the market narratives behind asset prices.
#[derive(Debug, Parser)]
#[command(name = "narrative")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON catalog to use instead of the bundled sample
    #[arg(long, global = true, env = "NARRATIVE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List narratives
    List(ListArgs),

    /// Show one narrative in full
    Show {
        /// Narrative id
        id: String,
    },

    /// Decay progress of every narrative
    Decay,

    /// Rank a portfolio's narrative exposures
    Exposure(ExposureArgs),

    /// Parse a holdings file and print the holdings
    Import(ImportArgs),

    /// Belief graph edges
    Graph,

    /// Market overview and dashboard statistics
    Overview,

    /// Narratives driving one asset
    Asset {
        /// Ticker symbol
        ticker: String,
    },

    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Ask the narrative assistant
    Chat {
        /// Question to ask; starts an interactive session when omitted
        message: Option<String>,
    },

    /// Stream an analyst explanation
    Explain {
        #[command(subcommand)]
        target: ExplainTarget,
    },
}

/// Arguments for the list command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text match on name or summary
    #[arg(short, long)]
    pub search: Option<String>,

    /// Exact tag
    #[arg(short, long)]
    pub tag: Option<String>,
}

/// Arguments for the exposure command.
#[derive(Debug, Args)]
pub struct ExposureArgs {
    /// Holdings file (defaults to the configured portfolio, then the sample)
    #[arg(short, long)]
    pub portfolio: Option<PathBuf>,

    /// Number of exposures to show
    #[arg(short = 'n', long)]
    pub top: Option<usize>,
}

/// Arguments for the import command.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV, TSV or semicolon-separated holdings file
    pub file: PathBuf,

    /// Portfolio name (defaults to the file stem)
    #[arg(short, long)]
    pub name: Option<String>,
}

/// What to explain.
#[derive(Debug, Subcommand)]
pub enum ExplainTarget {
    /// A narrative as a belief-graph node
    Node {
        /// Narrative id
        id: String,
    },

    /// A belief-graph edge
    Edge {
        /// Edge id
        id: String,
    },

    /// Why an asset carries its weight on a narrative
    Asset {
        /// Narrative id
        id: String,
        /// Ticker symbol
        ticker: String,
    },

    /// One piece of evidence on a narrative
    Evidence {
        /// Narrative id
        id: String,
        /// Evidence id
        evidence: String,
    },

    /// A position in the active portfolio
    Position {
        /// Ticker symbol
        ticker: String,

        /// Holdings file (defaults to the configured portfolio, then the sample)
        #[arg(short, long)]
        portfolio: Option<PathBuf>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
