mod models;
mod handlers;
mod services;
mod middleware;
mod config;
mod errors;
mod state;
mod views;

use axum::{
    routing::{get, post},
    Router,
    middleware::from_fn,
};
use anyhow::Context;
use tower_http::{
    services::ServeDir,
    limit::RequestBodyLimitLayer,
};
use tower_sessions::{MemoryStore, SessionManagerLayer};
use tower_sessions::cookie::SameSite;
use tracing_subscriber::EnvFilter;
use std::sync::Arc;
use crate::{
    config::Config,
    services::CsvStore,
    state::AppState,
};

fn build_router(state: AppState) -> Router {
    let config = &state.config;

    // Session store setup; the cookie only carries the session id
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.session.secure)
        .with_same_site(SameSite::Lax)
        .with_name(config.session.cookie_name.clone());

    let static_dir = ServeDir::new(&config.web.static_dir);
    let max_body_size = config.server.max_body_size;

    Router::new()
        // Auth routes
        .route("/", get(handlers::serve_login_page).post(handlers::handle_login))
        .route("/register", get(handlers::serve_register_page).post(handlers::handle_register))
        .route("/logout", get(handlers::handle_logout))

        // Ledger routes
        .route("/index", get(handlers::serve_index))
        .route("/entries", get(handlers::serve_entries))
        .route("/add_entry", post(handlers::add_entry))

        // Static files
        .nest_service("/static", static_dir)

        // Add middleware
        .layer(from_fn(middleware::resolve_auth))
        .layer(session_layer)
        .layer(RequestBodyLimitLayer::new(max_body_size))

        // Add state
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let store = CsvStore::open(
        &config.storage.data_dir,
        &config.storage.entries_file,
        &config.storage.users_file,
    )
    .context("Failed to open ledger store")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(Arc::new(store), config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}
