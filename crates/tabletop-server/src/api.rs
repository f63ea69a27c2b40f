use std::sync::Arc;

use axum::{http::Method, routing::get, Json, Router};
use serde::Serialize;
use tabletop_shared::token::JwtKeys;
use tabletop_store::{Database, Store};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::{auth_routes, campaign_routes, character_routes, role_routes};

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub jwt: Arc<JwtKeys>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Store, config: ServerConfig) -> Self {
        Self {
            store,
            jwt: Arc::new(JwtKeys::new(config.jwt_secret.as_bytes())),
            config: Arc::new(config),
        }
    }

    /// Run `f` against a fresh connection on the blocking pool. The
    /// connection is closed when `f` returns.
    pub async fn with_db<T, E, F>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Database) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<ServerError> + Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let mut db = store.connect().map_err(ServerError::from)?;
            f(&mut db).map_err(Into::into)
        })
        .await?
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(campaign_routes())
        .merge(character_routes())
        .merge(role_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
