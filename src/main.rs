//! Task Manager - Main Server
//!
//! Serves the task-tracking HTTP API over an in-memory entity store.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use task_manager::{api, seed, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "task-manager")]
#[command(about = "Task tracking backend server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the YAML config file (default: ./config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,task_manager=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, config } => {
            let mut config = Config::from_yaml_and_env(config.as_deref())?;
            if let Some(port) = port {
                config.server_port = port;
            }
            serve(config).await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState::new(config);
    seed::run(&state).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
