use std::path::Path;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::{NoteStore, SessionStore, SharingWrite};
use crate::entity::{Note, Session, User};
use crate::error::{JotpadError, Result};

const NOTE_COLUMNS: &str =
    "id, user_id, title, content_json, is_public, public_slug, created_at, updated_at";

/// SQLite-backed store owning one explicit connection.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Open or create the database file, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            [],
        )?;

        // public_slug is non-null exactly when is_public is set
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                content_json TEXT NOT NULL,
                is_public INTEGER NOT NULL DEFAULT 0 CHECK (is_public IN (0, 1)),
                public_slug TEXT UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                CHECK ((is_public = 1) = (public_slug IS NOT NULL)),
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            )",
            [],
        )?;

        self.conn.execute_batch(
            "
            CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id);
            CREATE INDEX IF NOT EXISTS idx_notes_public_slug ON notes(public_slug);
            CREATE INDEX IF NOT EXISTS idx_notes_is_public ON notes(is_public);
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            ",
        )?;

        Ok(())
    }

    /// Register a user.
    pub fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let user = User::new(name.to_string(), email.to_string());
        self.conn.execute(
            "INSERT INTO users (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.email, timestamp(&user.created_at)],
        )?;
        tracing::debug!(user_id = %user.id, "created user");
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?1",
                [id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: parse_timestamp(row, 3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Issue a session token for an existing user.
    pub fn create_session(&self, user_id: &str, ttl: Duration) -> Result<Session> {
        if self.get_user(user_id)?.is_none() {
            return Err(JotpadError::UserNotFound(user_id.to_string()));
        }

        let session = Session::new(user_id.to_string(), ttl);
        self.conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id,
                timestamp(&session.expires_at),
                timestamp(&session.created_at),
            ],
        )?;
        Ok(session)
    }

    /// Remove a user; their notes and sessions go with them.
    pub fn delete_user(&self, id: &str) -> Result<bool> {
        let changes = self.conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(changes > 0)
    }
}

impl NoteStore for SqliteNoteStore {
    fn create_note(&self, user_id: &str, title: &str, content_json: &str) -> Result<Note> {
        let note = Note::new(user_id.to_string(), title.to_string(), content_json.to_string());
        self.conn.execute(
            "INSERT INTO notes (id, user_id, title, content_json, is_public, public_slug, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 0, NULL, ?5, ?6)",
            params![
                note.id,
                note.user_id,
                note.title,
                note.content_json,
                timestamp(&note.created_at),
                timestamp(&note.updated_at),
            ],
        )?;
        tracing::debug!(note_id = %note.id, user_id = %user_id, "created note");
        Ok(note)
    }

    fn get_note(&self, id: &str, user_id: &str) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND user_id = ?2"),
                [id, user_id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    fn list_notes(&self, user_id: &str) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?1
             ORDER BY updated_at DESC, rowid DESC"
        ))?;

        let notes = stmt
            .query_map([user_id], note_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    fn update_note(
        &self,
        id: &str,
        user_id: &str,
        title: &str,
        content_json: &str,
    ) -> Result<bool> {
        let changes = self.conn.execute(
            "UPDATE notes SET title = ?1, content_json = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![title, content_json, timestamp(&Utc::now()), id, user_id],
        )?;
        tracing::debug!(note_id = %id, changes, "updated note");
        Ok(changes > 0)
    }

    fn delete_note(&self, id: &str, user_id: &str) -> Result<bool> {
        let changes = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1 AND user_id = ?2", [id, user_id])?;
        tracing::debug!(note_id = %id, changes, "deleted note");
        Ok(changes > 0)
    }

    fn set_sharing(&self, id: &str, user_id: &str, slug: Option<&str>) -> Result<SharingWrite> {
        let result = self.conn.execute(
            "UPDATE notes SET is_public = ?1, public_slug = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                slug.is_some(),
                slug,
                timestamp(&Utc::now()),
                id,
                user_id
            ],
        );

        match result {
            Ok(0) => Ok(SharingWrite::NoMatchingRow),
            Ok(_) => Ok(SharingWrite::Applied),
            Err(e) if is_unique_violation(&e) => Ok(SharingWrite::SlugTaken),
            Err(e) => Err(e.into()),
        }
    }

    fn get_public_note(&self, slug: &str) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE public_slug = ?1 AND is_public = 1"),
                [slug],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }
}

impl SessionStore for SqliteNoteStore {
    fn session_user(&self, token: &str) -> Result<Option<String>> {
        let session = self
            .conn
            .query_row(
                "SELECT token, user_id, expires_at, created_at FROM sessions WHERE token = ?1",
                [token],
                |row| {
                    Ok(Session {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        expires_at: parse_timestamp(row, 2)?,
                        created_at: parse_timestamp(row, 3)?,
                    })
                },
            )
            .optional()?;

        Ok(session
            .filter(|session| !session.is_expired_at(Utc::now()))
            .map(|session| session.user_id))
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content_json: row.get(3)?,
        is_public: row.get(4)?,
        public_slug: row.get(5)?,
        created_at: parse_timestamp(row, 6)?,
        updated_at: parse_timestamp(row, 7)?,
    })
}

/// Fixed-width RFC 3339 so text ordering matches time ordering.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl From<rusqlite::Error> for JotpadError {
    fn from(e: rusqlite::Error) -> Self {
        JotpadError::Storage(format!("SQLite error: {}", e))
    }
}
