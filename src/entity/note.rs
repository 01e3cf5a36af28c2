// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{render_content, Rendition};
use crate::sharing::SharingState;

/// A user's note.
///
/// `public_slug` is set exactly when `is_public` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content_json: String,
    pub is_public: bool,
    pub public_slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A fresh private note with a new id.
    pub fn new(user_id: String, title: String, content_json: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            title,
            content_json,
            is_public: false,
            public_slug: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn sharing_state(&self) -> SharingState {
        match (&self.public_slug, self.is_public) {
            (Some(slug), true) => SharingState::Public(slug.clone()),
            _ => SharingState::Private,
        }
    }

    /// Site-relative URL of the public page, if shared.
    pub fn public_path(&self) -> Option<String> {
        self.sharing_state().public_path()
    }

    pub fn render(&self) -> Rendition {
        render_content(&self.content_json)
    }

    /// Title used in listings; blank titles read as "Untitled".
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_note_is_private() {
        let note = Note::new("user-1".to_string(), "Title".to_string(), "{}".to_string());
        assert!(!note.is_public);
        assert!(note.public_slug.is_none());
        assert_eq!(note.sharing_state(), SharingState::Private);
        assert_eq!(note.public_path(), None);
        assert_eq!(note.created_at, note.updated_at);
        assert!(Uuid::parse_str(&note.id).is_ok());
    }

    #[test]
    fn test_public_note_state() {
        let mut note = Note::new("user-1".to_string(), "Title".to_string(), "{}".to_string());
        note.is_public = true;
        note.public_slug = Some("abc123XY".to_string());

        assert_eq!(note.sharing_state(), SharingState::Public("abc123XY".to_string()));
        assert_eq!(note.public_path(), Some("/p/abc123XY".to_string()));
    }

    #[test]
    fn test_display_title() {
        let mut note = Note::new("u".to_string(), "  ".to_string(), "{}".to_string());
        assert_eq!(note.display_title(), "Untitled");
        note.title = "Plans".to_string();
        assert_eq!(note.display_title(), "Plans");
    }
}
