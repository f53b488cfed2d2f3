#![allow(dead_code)]

use bson::DateTime;
use querycraft_cli::{CliError, Command, Config, execute};

pub const NOW_MILLIS: i64 = 1_700_000_000_000;

pub fn config(compact: bool) -> Config {
    Config {
        input: None,
        now: Some(DateTime::from_millis(NOW_MILLIS)),
        compact,
    }
}

/// Run a command over an in-memory request and return stdout.
pub fn run(command: Command, config: &Config, input: &str) -> Result<String, CliError> {
    let mut output = Vec::new();
    execute(command, config, input.as_bytes(), &mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

pub fn run_json(command: Command, input: &str) -> serde_json::Value {
    let out = run(command, &config(false), input).unwrap();
    serde_json::from_str(&out).unwrap()
}
