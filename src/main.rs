mod cli;

use clap::Parser;
use cli::{Cli, Commands, ValueKind};
use serde_json::json;
use tracing::info;

use historic_normalize::error::Error;
use historic_normalize::logging::{init_logging, LogConfig};
use historic_normalize::normalize::{normalize_date, normalize_name, normalize_year};
use historic_normalize::types::{ImportOptions, RawValue, Result};
use historic_normalize::{output, pipeline};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_format(cli.log_format)
        .with_log_file(cli.log_file.clone());
    init_logging(&log_config)?;

    match cli.command {
        Commands::Import {
            input,
            out,
            convention,
            strict,
            no_hash,
            delimiter,
            no_truncate,
        } => {
            let options = ImportOptions {
                convention,
                strict,
                hash_file: !no_hash,
                delimiter: delimiter.map(delimiter_byte).transpose()?,
                truncate: !no_truncate,
            };

            let result = pipeline::import_file(&input, &options)?;

            if let Some(out_path) = out {
                output::write_json_file(&result, &out_path)?;
                info!(path = %out_path.display(), records = result.records.len(), "records written");
            } else {
                output::write_json_stdout(&result)?;
            }
        }
        Commands::Columns { input, convention } => {
            let options = ImportOptions {
                convention,
                hash_file: false,
                ..ImportOptions::default()
            };
            let mapping = pipeline::inspect_columns(&input, &options)?;
            output::write_json_stdout(&mapping)?;
        }
        Commands::Parse { kind, text } => match kind {
            ValueKind::Date => output::write_json_stdout(&normalize_date(&text))?,
            ValueKind::Year => output::write_json_stdout(&normalize_year(&RawValue::from(text)))?,
            ValueKind::Name => output::write_json_stdout(&json!({ "value": normalize_name(&text) }))?,
        },
    }

    Ok(())
}

fn delimiter_byte(c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(|b| b.is_ascii())
        .ok_or_else(|| Error::InvalidInput(format!("delimiter must be a single ASCII character, got '{}'", c)))
}
