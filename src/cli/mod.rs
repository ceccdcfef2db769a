use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "3000")]
        port: String,
    },
    /// Send one message to the assistant and print the reply
    Chat {
        /// The message, e.g. "Is 10 July 2025 at 3 PM available?"
        message: String,
    },
}

#[derive(Parser)]
#[command(about = "Conversational appointment booking assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve { host, port } => serve::run(host, port).await,
        Command::Chat { message } => chat::run(&message).await,
    }
    Ok(())
}
