use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jotpad")]
#[command(version, about = "Rich-text notes with public share links")]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite database file (overrides JOTPAD_DB)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides JOTPAD_BIND)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Render document JSON to HTML
    Render {
        /// Input file; reads stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Print the rendered tree as JSON instead of HTML
        #[arg(long)]
        json: bool,
    },

    /// Check document JSON before storing it
    Validate {
        /// Input file; reads stdin when omitted or "-"
        file: Option<PathBuf>,
    },

    /// Manage users
    User(UserCommand),

    /// Manage notes
    Note(NoteCommand),
}

#[derive(Args, Debug)]
pub struct UserCommand {
    #[command(subcommand)]
    pub action: UserAction,
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Create a user and print a session token for it
    Add {
        name: String,
        email: String,

        /// Session lifetime in days
        #[arg(long, default_value_t = 30)]
        ttl_days: i64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a user along with their notes and sessions
    Remove {
        /// User id
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub action: NoteAction,
}

#[derive(Subcommand, Debug)]
pub enum NoteAction {
    /// Create a note
    Add {
        title: String,

        /// Owning user id
        #[arg(long)]
        user: String,

        /// Read plain-text content from stdin, one paragraph per line
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a user's notes, most recently updated first
    List {
        /// Owning user id
        #[arg(long)]
        user: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Publish a note under a fresh slug, or make it private with --off
    Share {
        /// Note id
        id: String,

        /// Owning user id
        #[arg(long)]
        user: String,

        /// Make the note private instead
        #[arg(long)]
        off: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
