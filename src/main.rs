use anyhow::Result;
use slotwise::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
