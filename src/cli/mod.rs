mod commands;
mod handlers;

pub use commands::{Cli, Commands, NoteAction, NoteCommand, UserAction, UserCommand};
pub use handlers::{
    handle_note_add, handle_note_list, handle_note_share, handle_render, handle_serve,
    handle_user_add, handle_user_remove, handle_validate,
};
