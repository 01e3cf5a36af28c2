//! Note persistence.
//!
//! Every note operation except the public slug lookup is owner-scoped: the
//! predicate always includes both the note id and the acting user's id, so a
//! note owned by someone else behaves exactly like a missing one.

mod sqlite_store;

pub use sqlite_store::SqliteNoteStore;

use crate::entity::Note;
use crate::error::Result;

/// Outcome of an owner-scoped sharing write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingWrite {
    /// The row was updated.
    Applied,
    /// No note with that id belongs to the user.
    NoMatchingRow,
    /// Another note already holds the requested slug.
    SlugTaken,
}

/// Storage collaborator for notes.
pub trait NoteStore {
    /// Insert a new private note for `user_id`.
    fn create_note(&self, user_id: &str, title: &str, content_json: &str) -> Result<Note>;

    fn get_note(&self, id: &str, user_id: &str) -> Result<Option<Note>>;

    /// Notes owned by `user_id`, most recently updated first.
    fn list_notes(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Replace title and content. Returns false when no owned note matched.
    fn update_note(&self, id: &str, user_id: &str, title: &str, content_json: &str)
        -> Result<bool>;

    /// Returns false when no owned note matched.
    fn delete_note(&self, id: &str, user_id: &str) -> Result<bool>;

    /// Set `is_public` and `public_slug` together in one statement.
    /// `Some(slug)` publishes, `None` makes the note private.
    fn set_sharing(&self, id: &str, user_id: &str, slug: Option<&str>) -> Result<SharingWrite>;

    /// Look up a note by slug, only while it is public.
    fn get_public_note(&self, slug: &str) -> Result<Option<Note>>;
}

/// Authentication collaborator: resolves an opaque session token.
pub trait SessionStore {
    /// The user id behind a live session, or `None` when the token is unknown
    /// or expired.
    fn session_user(&self, token: &str) -> Result<Option<String>>;
}
