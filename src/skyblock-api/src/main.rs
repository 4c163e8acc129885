//! Skyblock inventory server
//!
//! REST API returning parsed inventories for Hypixel Skyblock profiles.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use skyblock_api::{router, AppState, HypixelClient, DEFAULT_API_URL};
use skyblock_cache::{CacheRepository, SqliteCache, DEFAULT_DB_PATH};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(name = "skyblock-api")]
#[command(about = "Inventory API server for Hypixel Skyblock profiles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Cache database path
        #[arg(short, long, env = "CACHE_DATABASE", default_value = DEFAULT_DB_PATH)]
        database: String,

        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,

        /// Hypixel API key
        #[arg(long, env = "HYPIXEL_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Profiles endpoint, the player UUID is appended
        #[arg(long, env = "HYPIXEL_API_URL", default_value = DEFAULT_API_URL)]
        api_url: String,
    },
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            database,
            bind,
            api_key,
            api_url,
        } => {
            // Initialize tracing
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "skyblock_api=info,tower_http=debug".into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            if let Some(parent) = Path::new(&database).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }

            tracing::info!("Opening cache database: {}", database);
            let cache = SqliteCache::open(&database)?;
            cache.init()?;
            tracing::info!("Cache initialized");

            let source = Arc::new(HypixelClient::with_base_url(api_url, api_key));
            let state = Arc::new(AppState::new(cache, source));
            let app = router(state);

            let bind_addr = format!("{}:{}", bind, port);
            tracing::info!("Starting server on {}", bind_addr);

            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
