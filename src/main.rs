use clap::Parser;
use jotpad::cli::{
    handle_note_add, handle_note_list, handle_note_share, handle_render, handle_serve,
    handle_user_add, handle_user_remove, handle_validate, Cli, Commands, NoteAction, UserAction,
};

fn main() {
    let cli = Cli::parse();
    jotpad::logging::init();

    let db = cli.db;
    let result = match cli.command {
        Commands::Serve { bind } => handle_serve(db, bind),
        Commands::Render { file, json } => handle_render(file, json),
        Commands::Validate { file } => handle_validate(file),
        Commands::User(user) => match user.action {
            UserAction::Add {
                name,
                email,
                ttl_days,
                json,
            } => handle_user_add(db, name, email, ttl_days, json),
            UserAction::Remove { id } => handle_user_remove(db, id),
        },
        Commands::Note(note) => match note.action {
            NoteAction::Add {
                title,
                user,
                stdin,
                json,
            } => handle_note_add(db, user, title, stdin, json),
            NoteAction::List { user, json } => handle_note_list(db, user, json),
            NoteAction::Share { id, user, off, json } => {
                handle_note_share(db, id, user, off, json)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
