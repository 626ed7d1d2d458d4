use anyhow::Result;
use bottega::cli::{setup_tracing, Cli};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    cli.run().await
}
