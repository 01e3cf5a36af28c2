//! Public sharing of notes.
//!
//! A note is either `Private` or `Public(slug)`. Every transition is a single
//! owner-scoped write of `is_public` and `public_slug` together, so no reader
//! ever sees a public note without a slug or the reverse.

mod slug;

pub use slug::{generate_slug, is_valid_slug, SLUG_ALPHABET, SLUG_LENGTH};

use crate::error::{JotpadError, Result};
use crate::storage::{NoteStore, SharingWrite};

/// Total slug candidates tried before giving up on a publish.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharingState {
    Private,
    Public(String),
}

impl SharingState {
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public(_))
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Self::Public(slug) => Some(slug),
            Self::Private => None,
        }
    }

    /// Site-relative path of the public page.
    pub fn public_path(&self) -> Option<String> {
        self.slug().map(|slug| format!("/p/{}", slug))
    }
}

/// Make a note public or private.
///
/// Publishing always assigns a fresh slug, even when the note is already
/// public, so previously handed out links stop working.
pub fn toggle_sharing<S>(
    store: &S,
    note_id: &str,
    user_id: &str,
    make_public: bool,
) -> Result<SharingState>
where
    S: NoteStore + ?Sized,
{
    toggle_sharing_with(store, note_id, user_id, make_public, generate_slug)
}

/// [`toggle_sharing`] with a caller-supplied slug source.
pub fn toggle_sharing_with<S, F>(
    store: &S,
    note_id: &str,
    user_id: &str,
    make_public: bool,
    mut next_slug: F,
) -> Result<SharingState>
where
    S: NoteStore + ?Sized,
    F: FnMut() -> String,
{
    if !make_public {
        return match store.set_sharing(note_id, user_id, None)? {
            SharingWrite::Applied => {
                tracing::info!(note_id, "note made private");
                Ok(SharingState::Private)
            }
            SharingWrite::NoMatchingRow => Err(JotpadError::NoteNotFound(note_id.to_string())),
            SharingWrite::SlugTaken => Err(JotpadError::Storage(
                "slug conflict while clearing a slug".to_string(),
            )),
        };
    }

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        let slug = next_slug();
        match store.set_sharing(note_id, user_id, Some(&slug))? {
            SharingWrite::Applied => {
                tracing::info!(note_id, %slug, "note made public");
                return Ok(SharingState::Public(slug));
            }
            SharingWrite::NoMatchingRow => {
                return Err(JotpadError::NoteNotFound(note_id.to_string()));
            }
            SharingWrite::SlugTaken => {
                tracing::warn!(note_id, attempt, "public slug collision, retrying");
            }
        }
    }

    Err(JotpadError::SlugCollision {
        attempts: MAX_SLUG_ATTEMPTS,
    })
}
