//! The `querycraft` command: wire-form JSON in, MongoDB JSON out.

pub mod cli;
pub mod config;
pub mod error;
pub mod run;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::CliError;
pub use run::{execute, open_input};
