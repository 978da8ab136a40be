use clap::{Parser, Subcommand};

use crate::commands;
use crate::constants::DEFAULT_SERVER_PORT;

#[derive(Parser)]
#[command(name = "krx-explorer")]
#[command(about = "Korean listed-company search and chart API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
        port: u16,
    },
    /// Download the corporate listing and rebuild the search index
    Load {
        /// Also compute sentence embeddings for semantic search
        #[arg(long)]
        embeddings: bool,
    },
    /// Show search engine and index status
    Status,
}

pub async fn run() {
    // Every subcommand logs through tracing, so the subscriber goes up
    // before dispatch
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Load { embeddings } => {
            commands::load::run(embeddings).await;
        }
        Commands::Status => {
            commands::status::run().await;
        }
    }
}
