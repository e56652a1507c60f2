use anyhow::Result;
use clap::Parser;

use unlatch::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}
