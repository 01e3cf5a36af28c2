//! Note use-cases shared by the HTTP server and the CLI.
//!
//! Validation happens here, before anything reaches storage. Lookups that
//! match no owned note all report `NoteNotFound`, whether the note is missing
//! or belongs to someone else.

use crate::document::{validate_content_json, validate_title};
use crate::entity::Note;
use crate::error::{JotpadError, Result};
use crate::storage::NoteStore;

pub fn create_note<S>(store: &S, user_id: &str, title: &str, content_json: &str) -> Result<Note>
where
    S: NoteStore + ?Sized,
{
    validate_title(title)?;
    validate_content_json(content_json).inspect_err(|e| {
        tracing::warn!(user_id, error = %e, "rejected note content");
    })?;
    store.create_note(user_id, title, content_json)
}

pub fn get_note<S>(store: &S, id: &str, user_id: &str) -> Result<Note>
where
    S: NoteStore + ?Sized,
{
    store
        .get_note(id, user_id)?
        .ok_or_else(|| JotpadError::NoteNotFound(id.to_string()))
}

/// Replace title and content, returning the stored note.
pub fn update_note<S>(
    store: &S,
    id: &str,
    user_id: &str,
    title: &str,
    content_json: &str,
) -> Result<Note>
where
    S: NoteStore + ?Sized,
{
    validate_title(title)?;
    validate_content_json(content_json).inspect_err(|e| {
        tracing::warn!(note_id = id, error = %e, "rejected note content");
    })?;

    if !store.update_note(id, user_id, title, content_json)? {
        return Err(JotpadError::NoteNotFound(id.to_string()));
    }
    get_note(store, id, user_id)
}

pub fn delete_note<S>(store: &S, id: &str, user_id: &str) -> Result<()>
where
    S: NoteStore + ?Sized,
{
    if !store.delete_note(id, user_id)? {
        return Err(JotpadError::NoteNotFound(id.to_string()));
    }
    tracing::info!(note_id = id, "note deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ContentError, TitleError};
    use crate::storage::SqliteNoteStore;

    const HELLO_DOC: &str =
        r#"{"type":"doc","content":[{"type":"paragraph","content":[{"type":"text","text":"Hi"}]}]}"#;

    fn setup() -> (SqliteNoteStore, String) {
        let store = SqliteNoteStore::open_in_memory().unwrap();
        let user = store.create_user("Alice", "alice@example.com").unwrap();
        (store, user.id)
    }

    #[test]
    fn test_create_validates_input() {
        let (store, user_id) = setup();

        let err = create_note(&store, &user_id, "", HELLO_DOC).unwrap_err();
        assert!(matches!(err, JotpadError::InvalidTitle(TitleError::TitleRequired)));

        let err = create_note(&store, &user_id, "Title", "null").unwrap_err();
        assert!(matches!(err, JotpadError::InvalidContent(ContentError::NotAnObject)));

        let err = create_note(&store, &user_id, "Title", "{oops").unwrap_err();
        assert!(matches!(err, JotpadError::InvalidContent(ContentError::NotJson)));

        assert!(store.list_notes(&user_id).unwrap().is_empty());
    }

    #[test]
    fn test_create_and_render() {
        let (store, user_id) = setup();
        let note = create_note(&store, &user_id, "Greeting", HELLO_DOC).unwrap();

        let html = get_note(&store, &note.id, &user_id).unwrap().render().to_html();
        assert!(html.contains("<p><span>Hi</span></p>"));
    }

    #[test]
    fn test_update_returns_stored_note() {
        let (store, user_id) = setup();
        let note = create_note(&store, &user_id, "Old", "{}").unwrap();

        let updated = update_note(&store, &note.id, &user_id, "New", HELLO_DOC).unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content_json, HELLO_DOC);
    }

    #[test]
    fn test_update_rejects_invalid_content_without_writing() {
        let (store, user_id) = setup();
        let note = create_note(&store, &user_id, "Keep", "{}").unwrap();

        let err = update_note(&store, &note.id, &user_id, "Keep", "42").unwrap_err();
        assert!(matches!(err, JotpadError::InvalidContent(ContentError::NotAnObject)));
        assert_eq!(get_note(&store, &note.id, &user_id).unwrap().content_json, "{}");
    }

    #[test]
    fn test_missing_notes_report_not_found() {
        let (store, user_id) = setup();

        assert!(matches!(
            get_note(&store, "missing", &user_id),
            Err(JotpadError::NoteNotFound(_))
        ));
        assert!(matches!(
            update_note(&store, "missing", &user_id, "T", "{}"),
            Err(JotpadError::NoteNotFound(_))
        ));
        assert!(matches!(
            delete_note(&store, "missing", &user_id),
            Err(JotpadError::NoteNotFound(_))
        ));
    }
}
