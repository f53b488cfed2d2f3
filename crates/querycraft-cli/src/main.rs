use clap::Parser;
use tracing_subscriber::EnvFilter;

use querycraft_cli::{Cli, Config, execute, open_input};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env(&cli).unwrap_or_else(|e| {
        eprintln!("querycraft: {e}");
        std::process::exit(2);
    });

    let result = open_input(&config)
        .and_then(|input| execute(cli.command, &config, input, std::io::stdout().lock()));

    if let Err(e) = result {
        eprintln!("querycraft: {e}");
        std::process::exit(1);
    }
}
