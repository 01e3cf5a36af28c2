pub mod cli;
pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod logging;
pub mod notes;
pub mod server;
pub mod sharing;
pub mod storage;

pub use config::ServerConfig;
pub use document::{render_content, validate_content_json, Document, Rendition};
pub use entity::{Note, User};
pub use error::{JotpadError, Result};
pub use sharing::{toggle_sharing, SharingState};
pub use storage::{NoteStore, SqliteNoteStore};
