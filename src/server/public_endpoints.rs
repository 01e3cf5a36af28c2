//! Unauthenticated, read-only pages for shared notes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};

use super::{AppState, HttpError};
use crate::document::escape_html;
use crate::entity::Note;
use crate::sharing::is_valid_slug;
use crate::storage::NoteStore;

pub fn routes() -> Router<AppState> {
    Router::new().route("/p/{slug}", get(public_note))
}

async fn public_note(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Html<String>), HttpError> {
    if !is_valid_slug(&slug) {
        return Ok(not_found_page());
    }

    let note = state.store.lock().await.get_public_note(&slug)?;
    match note {
        Some(note) => Ok((StatusCode::OK, Html(note_page(&note)))),
        None => Ok(not_found_page()),
    }
}

fn note_page(note: &Note) -> String {
    let title = escape_html(note.display_title());
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<main class=\"public-note\">\n<h1>{title}</h1>\n{body}\n</main>\n</body>\n</html>\n",
        title = title,
        body = note.render().to_html(),
    )
}

fn not_found_page() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Note not found</title>\n</head>\n<body>\n<main class=\"public-note\">\n<h1>Note not found</h1>\n<p>This note does not exist or is no longer shared.</p>\n</main>\n</body>\n</html>\n"
                .to_string(),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_page_escapes_title() {
        let note = Note::new(
            "user-1".to_string(),
            "<script>alert(1)</script>".to_string(),
            r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hi"}]}]}"#
                .to_string(),
        );

        let page = note_page(&note);
        assert!(page.contains("<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1>"));
        assert!(page.contains("<p><span>Hi</span></p>"));
        assert!(!page.contains("<script>"));
    }
}
