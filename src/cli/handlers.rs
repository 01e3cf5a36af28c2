use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde_json::json;

use crate::config::ServerConfig;
use crate::document::{render_content, validate_content_json, Document};
use crate::error::{JotpadError, Result};
use crate::notes;
use crate::sharing::{toggle_sharing, SharingState};
use crate::storage::{NoteStore, SqliteNoteStore};

/// Read a document from `file`, or from stdin when no file (or "-") is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => Ok(fs::read_to_string(path)?),
        _ => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn open_store(db: Option<PathBuf>) -> Result<(SqliteNoteStore, ServerConfig)> {
    let config = ServerConfig::from_env().with_overrides(db, None);
    let store = SqliteNoteStore::open(&config.db_path)?;
    Ok((store, config))
}

fn ensure_user(store: &SqliteNoteStore, user_id: &str) -> Result<()> {
    match store.get_user(user_id)? {
        Some(_) => Ok(()),
        None => Err(JotpadError::UserNotFound(user_id.to_string())),
    }
}

pub fn handle_serve(db: Option<PathBuf>, bind: Option<String>) -> Result<()> {
    let config = ServerConfig::from_env().with_overrides(db, bind);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(crate::server::serve(config))
}

pub fn handle_render(file: Option<PathBuf>, json: bool) -> Result<()> {
    let content = read_input(file.as_deref())?;
    let rendition = render_content(&content);

    if json {
        println!("{}", serde_json::to_string_pretty(&rendition)?);
    } else {
        println!("{}", rendition.to_html());
    }
    Ok(())
}

pub fn handle_validate(file: Option<PathBuf>) -> Result<()> {
    let content = read_input(file.as_deref())?;
    validate_content_json(&content)?;
    println!("Content is valid ({} bytes)", content.len());
    Ok(())
}

pub fn handle_user_add(
    db: Option<PathBuf>,
    name: String,
    email: String,
    ttl_days: i64,
    json: bool,
) -> Result<()> {
    if ttl_days <= 0 {
        return Err(JotpadError::Config(format!(
            "session lifetime must be positive, got {} days",
            ttl_days
        )));
    }

    let (store, _) = open_store(db)?;
    let user = store.create_user(&name, &email)?;
    let session = store.create_session(&user.id, Duration::days(ttl_days))?;

    if json {
        let output = json!({ "user": user, "session": session });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Created user {} <{}>", user.name, user.email);
        println!("  id:      {}", user.id);
        println!("  token:   {}", session.token);
        println!("  expires: {}", session.expires_at.to_rfc3339());
    }
    Ok(())
}

pub fn handle_user_remove(db: Option<PathBuf>, id: String) -> Result<()> {
    let (store, _) = open_store(db)?;
    if !store.delete_user(&id)? {
        return Err(JotpadError::UserNotFound(id));
    }
    tracing::info!(user_id = %id, "user removed");
    println!("Removed user {}", id);
    Ok(())
}

pub fn handle_note_add(
    db: Option<PathBuf>,
    user_id: String,
    title: String,
    stdin: bool,
    json: bool,
) -> Result<()> {
    let (store, _) = open_store(db)?;
    ensure_user(&store, &user_id)?;

    let document = if stdin {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Document::from_plain_text(&text)
    } else {
        Document::default()
    };

    let note = notes::create_note(&store, &user_id, &title, &document.to_json())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&note)?);
    } else {
        println!("Created note {} - {}", note.id, note.display_title());
    }
    Ok(())
}

pub fn handle_note_list(db: Option<PathBuf>, user_id: String, json: bool) -> Result<()> {
    let (store, _) = open_store(db)?;
    ensure_user(&store, &user_id)?;
    let notes = store.list_notes(&user_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&notes)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        println!("Notes:\n");
        for note in notes {
            let shared = note
                .public_path()
                .map(|path| format!(" [public {}]", path))
                .unwrap_or_default();
            println!(
                "  {} {}{}  (updated {})",
                note.id,
                note.display_title(),
                shared,
                note.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
    Ok(())
}

pub fn handle_note_share(
    db: Option<PathBuf>,
    id: String,
    user_id: String,
    off: bool,
    json: bool,
) -> Result<()> {
    let (store, config) = open_store(db)?;
    // Surface a missing note before touching sharing state.
    notes::get_note(&store, &id, &user_id)?;

    let state = toggle_sharing(&store, &id, &user_id, !off)?;
    let public_url = state.public_path().map(|path| config.public_url(&path));

    if json {
        let output = json!({
            "is_public": state.is_public(),
            "public_slug": state.slug(),
            "public_url": public_url,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match (&state, public_url) {
            (SharingState::Public(_), Some(url)) => println!("Note {} is public at {}", id, url),
            _ => println!("Note {} is private", id),
        }
    }
    Ok(())
}
