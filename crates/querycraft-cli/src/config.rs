use std::path::PathBuf;

use bson::DateTime;
use querycraft_mongo::Translator;

use crate::cli::Cli;
use crate::error::CliError;

pub const NOW_VAR: &str = "QUERYCRAFT_NOW";
pub const COMPACT_VAR: &str = "QUERYCRAFT_COMPACT";

/// Settings for one invocation, after flags and environment are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input: Option<PathBuf>,
    /// Reference instant for relative dates. `None` reads the clock.
    pub now: Option<DateTime>,
    pub compact: bool,
}

impl Config {
    /// Flags win over the environment.
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let now = match cli.now {
            Some(millis) => Some(millis),
            None => env(NOW_VAR)
                .map(|value| {
                    value.trim().parse::<i64>().map_err(|_| CliError::InvalidSetting {
                        name: NOW_VAR,
                        value,
                    })
                })
                .transpose()?,
        };

        let compact = cli.compact
            || match env(COMPACT_VAR) {
                Some(value) => parse_flag(COMPACT_VAR, value)?,
                None => false,
            };

        Ok(Self {
            input: cli.input.clone(),
            now: now.map(DateTime::from_millis),
            compact,
        })
    }

    pub fn from_env(cli: &Cli) -> Result<Self, CliError> {
        Self::resolve(cli, |name| std::env::var(name).ok())
    }

    pub fn translator(&self) -> Translator {
        match self.now {
            Some(now) => Translator::at(now),
            None => Translator::new(),
        }
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CliError::InvalidSetting { name, value }),
    }
}
