//! EcoChat CLI — the main entry point.
//!
//! Commands:
//! - `gateway`   — Start the HTTP chat server
//! - `chat`      — Interactive or single-message chat, in process
//! - `status`    — Show configuration and credential status
//! - `providers` — List provider selections

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ecochat",
    about = "EcoChat — a sustainability chat assistant backend",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with EcoChat from the terminal
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Session to continue
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Show configuration status
    Status,

    /// List provider selections
    Providers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Chat { message, session } => commands::chat::run(message, session).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Providers => commands::providers::run().await?,
    }

    Ok(())
}
