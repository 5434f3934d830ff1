use anyhow::Result;
use clap::Parser;

mod cli;
mod report;
mod run;
mod spinner;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    run::run(cli).await?;
    Ok(())
}
