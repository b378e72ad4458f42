mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::order;
use tracing_subscriber::EnvFilter;

/// `-v` enables info logging, `-vv` debug; `RUST_LOG` overrides both.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spatialorder={level},spatialorder_cli={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match &cli.command {
        Commands::Order(args) => order::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
