use std::fs::File;
use std::io::{BufReader, Read, Write};

use bson::Document;
use serde::Serialize;

use crate::cli::Command;
use crate::config::Config;
use crate::error::CliError;

/// Open the configured input, falling back to stdin.
pub fn open_input(config: &Config) -> Result<Box<dyn Read>, CliError> {
    match &config.input {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Read {
                path: path.display().to_string(),
                source,
            })?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

/// Decode the request from `input`, translate it and write JSON to `output`.
pub fn execute(
    command: Command,
    config: &Config,
    input: impl Read,
    mut output: impl Write,
) -> Result<(), CliError> {
    let translator = config.translator();
    tracing::debug!(?command, now = %translator.now(), "translating request");

    match command {
        Command::Find => {
            let request: Document = serde_json::from_reader(input)?;
            let body = translator.find_from_document(&request)?;
            write_json(&mut output, &body, config.compact)?;
        }
        Command::Aggregate => {
            let requests: Vec<Document> = serde_json::from_reader(input)?;
            let pipeline = translator.pipeline_from_documents(&requests)?;
            tracing::info!(
                requests = requests.len(),
                stages = pipeline.len(),
                "pipeline ready"
            );
            write_json(&mut output, &pipeline, config.compact)?;
        }
    }
    Ok(())
}

fn write_json(output: &mut impl Write, value: &impl Serialize, compact: bool) -> Result<(), CliError> {
    if compact {
        serde_json::to_writer(&mut *output, value)?;
    } else {
        serde_json::to_writer_pretty(&mut *output, value)?;
    }
    writeln!(output)?;
    Ok(())
}
