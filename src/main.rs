mod app;
mod cli;
mod config;
mod error;
mod migrate;
mod model;
mod providers;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;

fn init_logging(verbose: bool) {
    let default = if verbose { "bb2gh=debug" } else { "bb2gh=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli::handle_migrate(cli).await
}
