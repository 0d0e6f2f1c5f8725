//! # mentorlink-server
//!
//! HTTP API for MentorLink, a mentor/mentee matching service.
//!
//! This binary provides:
//! - **Accounts** with a mentor or mentee role and an editable profile
//! - **Mentor directory** with search, interest-based recommendations,
//!   booking links and reviews
//! - **Mentor dashboard** with statistics and a live task list
//! - **Photo storage** for profile pictures

mod accounts;
mod api;
mod config;
mod dashboard;
mod directory;
mod error;
mod identity;
mod photo_store;

use std::sync::Arc;

use mentorlink_store::{Database, SqliteDocumentStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::photo_store::PhotoStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,mentorlink_server=debug,mentorlink_store=info")
        }))
        .init();

    info!("Starting MentorLink server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open storage
    // -----------------------------------------------------------------------
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    info!(path = ?db.path(), "Database opened");

    let photos = PhotoStore::new(
        config.photo_storage_path.clone(),
        config.public_base_url.clone(),
        config.max_photo_size,
    )
    .await?;

    let app_state = AppState {
        store: Arc::new(SqliteDocumentStore::new(db)),
        photos: Arc::new(photos),
        rating_write_mode: config.rating_write_mode,
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
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
