use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "querycraft", version)]
#[command(about = "Translate querycraft requests into MongoDB queries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Read the request from this file instead of stdin
    #[arg(long, global = true)]
    pub input: Option<PathBuf>,

    /// Reference instant for `daysAgo` values, in epoch milliseconds
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub now: Option<i64>,

    /// Print single-line JSON
    #[arg(long, global = true, default_value = "false")]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Translate one filter spec into `{ filter, sort, limit }`
    Find,
    /// Translate an array of aggregation requests into a pipeline
    Aggregate,
}
