//! HTTP server.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/notes` - List the caller's notes, newest first
//! - `POST /api/notes` - Create a note
//! - `GET /api/notes/{id}` - Get a note
//! - `PUT /api/notes/{id}` - Replace title and content
//! - `DELETE /api/notes/{id}` - Delete a note
//! - `GET /api/notes/{id}/html` - Rendered note body
//! - `POST /api/notes/{id}/share` - Make a note public or private
//! - `GET /p/{slug}` - Public, unauthenticated note page
//!
//! Everything under `/api/notes` requires `Authorization: Bearer <token>`.

mod auth;
mod http_error;
mod note_endpoints;
mod public_endpoints;

pub use auth::CurrentUser;
pub use http_error::HttpError;

use std::sync::Arc;

use axum::Router;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::storage::SqliteNoteStore;

/// State shared by all handlers.
///
/// The store sits behind an async mutex; a handler holds the guard only for
/// its own storage calls.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<SqliteNoteStore>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: SqliteNoteStore, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            config: Arc::new(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(note_endpoints::routes())
        .merge(public_endpoints::routes())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Open the database and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    config.validate()?;

    let store = SqliteNoteStore::open(&config.db_path)?;
    let addr = config.bind_addr.clone();
    tracing::info!(db = %config.db_path.display(), "database opened");

    let app = create_router(AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("jotpad listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
