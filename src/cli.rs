use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use historic_normalize::logging::LogFormat;
use historic_normalize::reconcile::NamingConvention;

/// Normalize historical census and student records into uncertainty-annotated values
#[derive(Parser, Debug)]
#[command(name = "historic-normalize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log format: pretty, compact, or json
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a data file and write normalized records as JSON
    Import {
        /// Input file path (.csv, .tsv, .txt, .xlsx, .xls, .json)
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file path (stdout if not specified)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Naming convention to use instead of detecting one
        /// (spaced, camel, snake, short, positional)
        #[arg(long)]
        convention: Option<NamingConvention>,

        /// Fail when any canonical field has no source column
        #[arg(long, default_value_t = false)]
        strict: bool,

        /// Skip the SHA-256 file fingerprint
        #[arg(long, default_value_t = false)]
        no_hash: bool,

        /// Field delimiter for delimited text (sniffed when omitted)
        #[arg(long)]
        delimiter: Option<char>,

        /// Keep text fields longer than their storage limit
        #[arg(long, default_value_t = false)]
        no_truncate: bool,
    },

    /// Show how a file's columns map onto canonical fields
    Columns {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Naming convention to use instead of detecting one
        #[arg(long)]
        convention: Option<NamingConvention>,
    },

    /// Normalize a single value and print the result
    Parse {
        /// How to interpret the value
        #[arg(long, value_enum)]
        kind: ValueKind,

        /// Raw value text
        text: String,
    },
}

/// Field kind for the `parse` command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValueKind {
    Date,
    Year,
    Name,
}
