//! # tabletop-server
//!
//! HTTP API for the tabletop campaign manager.
//!
//! This binary provides:
//! - **Accounts**: registration, password login, JWT access tokens (bearer
//!   header or `access_token` cookie)
//! - **Campaigns** owned by a game master, with character summaries
//! - **Characters** with attribute values and skill bonuses, partial updates
//!   and dice rolls against the sheet
//! - **Campaign roles** assigned by the campaign's GM

mod api;
mod auth;
mod config;
mod error;
mod extract;
mod routes;

use tabletop_shared::constants::APP_NAME;
use tabletop_store::Store;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,tabletop_server=debug,tabletop_store=debug")
            }),
        )
        .init();

    info!("Starting {} server v{}", APP_NAME, env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the database (runs migrations once)
    // -----------------------------------------------------------------------
    let store = Store::open(&config.database_path)?;

    let http_addr = config.http_addr;
    let app_state = AppState::new(store, config);

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
