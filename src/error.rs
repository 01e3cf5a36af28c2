use thiserror::Error;

use crate::document::{ContentError, TitleError};

#[derive(Error, Debug)]
pub enum JotpadError {
    /// Covers both a missing note and a note owned by someone else.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid content: {0}")]
    InvalidContent(#[from] ContentError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TitleError),

    #[error("Could not assign a unique public slug after {attempts} attempts")]
    SlugCollision { attempts: usize },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JotpadError>;
