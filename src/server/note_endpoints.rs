//! Owner-scoped note endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AppState, CurrentUser, HttpError};
use crate::entity::Note;
use crate::error::JotpadError;
use crate::notes;
use crate::sharing::toggle_sharing;
use crate::storage::NoteStore;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/api/notes/{id}/html", get(note_html))
        .route("/api/notes/{id}/share", post(share_note))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

/// Title and serialized document, as sent by the editor.
#[derive(Debug, Deserialize)]
pub struct NoteInput {
    pub title: String,
    pub content_json: String,
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    #[serde(flatten)]
    pub note: Note,
    pub public_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub is_public: bool,
    pub public_slug: Option<String>,
    pub public_url: Option<String>,
}

impl NoteResponse {
    fn new(note: Note, state: &AppState) -> Self {
        let public_url = note.public_path().map(|path| state.config.public_url(&path));
        Self { note, public_url }
    }
}

async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<Vec<NoteResponse>>, HttpError> {
    let notes = state.store.lock().await.list_notes(&user_id)?;
    Ok(Json(
        notes
            .into_iter()
            .map(|note| NoteResponse::new(note, &state))
            .collect(),
    ))
}

async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    input: Result<Json<NoteInput>, JsonRejection>,
) -> Result<(StatusCode, Json<NoteResponse>), HttpError> {
    let Json(input) = input.map_err(|e| HttpError::bad_request(e.body_text()))?;

    let note = {
        let store = state.store.lock().await;
        notes::create_note(&*store, &user_id, &input.title, &input.content_json)?
    };
    tracing::info!(note_id = %note.id, "note created");

    Ok((StatusCode::CREATED, Json(NoteResponse::new(note, &state))))
}

async fn get_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<NoteResponse>, HttpError> {
    let note = notes::get_note(&*state.store.lock().await, &id, &user_id)?;
    Ok(Json(NoteResponse::new(note, &state)))
}

async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    input: Result<Json<NoteInput>, JsonRejection>,
) -> Result<Json<NoteResponse>, HttpError> {
    let Json(input) = input.map_err(|e| HttpError::bad_request(e.body_text()))?;

    let note = {
        let store = state.store.lock().await;
        notes::update_note(&*store, &id, &user_id, &input.title, &input.content_json)?
    };
    Ok(Json(NoteResponse::new(note, &state)))
}

async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, HttpError> {
    notes::delete_note(&*state.store.lock().await, &id, &user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn note_html(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Html<String>, HttpError> {
    let note = notes::get_note(&*state.store.lock().await, &id, &user_id)?;
    Ok(Html(note.render().to_html()))
}

/// Body: `{"public": bool}`.
async fn share_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ShareResponse>, HttpError> {
    let store = state.store.lock().await;

    if store.get_note(&id, &user_id)?.is_none() {
        return Err(HttpError::note_not_found());
    }

    let body: Value =
        serde_json::from_slice(&body).map_err(|_| HttpError::bad_request("Invalid request body"))?;
    let make_public = body
        .get("public")
        .and_then(Value::as_bool)
        .ok_or_else(|| HttpError::bad_request("Missing 'public' field"))?;

    let sharing = toggle_sharing(&*store, &id, &user_id, make_public).map_err(|e| match e {
        JotpadError::NoteNotFound(_) => HttpError::note_not_found(),
        other => {
            tracing::error!(note_id = %id, error = %other, "failed to update sharing");
            HttpError::internal("Failed to update sharing")
        }
    })?;

    Ok(Json(ShareResponse {
        is_public: sharing.is_public(),
        public_slug: sharing.slug().map(str::to_string),
        public_url: sharing
            .public_path()
            .map(|path| state.config.public_url(&path)),
    }))
}
