use clap::Parser;
use ozone_mapper::cli::{run, Cli};
use ozone_mapper::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
