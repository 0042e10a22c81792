//! travellist - a travel bucket-list tracker for the terminal.
//!
//! Runs an interactive shell. Accounts, remembered sessions and destination
//! lists live in the data directory; a session started without
//! `--remember` lasts until the shell exits.

mod commands;
mod output;

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use travellist_core::destinations::DestinationFilter;
use travellist_core::{AppError, Config, NewDestination, ProfileUpdate, TravelList};

use commands::{Command, ProfileField, HELP};

/// Log file name inside the data directory
const LOG_FILE: &str = "travellist.log";

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load().context("Failed to load configuration")?;
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    let _log_guard = init_tracing(config.log_to_file.then_some(data_dir.as_path()));
    info!("travellist starting");

    let mut app = TravelList::open(&config)?;
    match app.session.current_user() {
        Some(user) => println!("Welcome back, {}!", user.name),
        None => println!("Welcome to travellist. Type 'help' to get started."),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("travellist> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }

        if let Err(e) = execute(&mut app, &config, command) {
            println!("Error: {}", describe(&e));
        }
    }

    info!("travellist shutting down");
    Ok(())
}

/// User-facing text for a failure. Storage detail goes to the log instead.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Auth(auth)) => {
            if auth.is_retryable() {
                warn!(error = %auth, "Storage failure");
            }
            auth.user_message()
        }
        _ => format!("{:#}", err),
    }
}

fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Password: ").context("Failed to read password")
}

/// Expand a short id prefix to the full id of one of the user's destinations.
fn resolve_id(app: &TravelList, prefix: &str) -> Result<String> {
    let matches: Vec<String> = app
        .destinations(&DestinationFilter::default())?
        .into_iter()
        .map(|d| d.id)
        .filter(|id| id.starts_with(prefix))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => Err(anyhow::anyhow!("No destination with id {}", prefix)),
        _ => Err(anyhow::anyhow!("Id {} is ambiguous", prefix)),
    }
}

fn execute(app: &mut TravelList, config: &Config, command: Command) -> Result<()> {
    match command {
        Command::Register { email, name } => {
            let password = prompt_password()?;
            let user = app
                .session
                .register(&email, &password, &name)
                .map_err(AppError::from)?;
            println!("Welcome, {}! You are logged in until you quit.", user.name);
        }
        Command::Login { email, remember } => {
            let password = prompt_password()?;
            let remember = remember.unwrap_or(config.remember_me);
            let user = app
                .session
                .login(&email, &password, remember)
                .map_err(AppError::from)?;
            println!("Logged in as {}.", user.name);
        }
        Command::Logout => {
            app.session.logout().map_err(AppError::from)?;
            println!("Logged out.");
        }
        Command::WhoAmI => match app.session.current_user() {
            Some(user) => println!("{}", output::format_user(user)),
            None => println!("Not logged in."),
        },
        Command::Profile(field) => {
            let update = match field {
                ProfileField::Name(name) => ProfileUpdate::name(name),
                ProfileField::Email(email) => ProfileUpdate::email(email),
                ProfileField::Avatar(avatar) => ProfileUpdate::profile_picture(avatar),
            };
            match app.session.update_profile(&update).map_err(AppError::from)? {
                Some(user) => println!("{}", output::format_user(&user)),
                None => println!("Not logged in."),
            }
        }
        Command::Add {
            name,
            country,
            priority,
            status,
        } => {
            let draft = NewDestination::new(name, country)
                .with_priority(priority)
                .with_status(status);
            let destination = app.add_destination(draft)?;
            println!("Added {}", output::format_destination_row(&destination));
        }
        Command::List { status, query } => {
            let filter = DestinationFilter::query(query).with_status(status);
            println!("{}", output::format_destinations(&app.destinations(&filter)?));
        }
        Command::SetStatus { id, status } => {
            let id = resolve_id(app, &id)?;
            app.set_status(&id, status)?;
            println!("Marked {} as {}.", output::short_id(&id), status);
        }
        Command::Remove { id } => {
            let id = resolve_id(app, &id)?;
            app.remove_destination(&id)?;
            println!("Removed {}.", output::short_id(&id));
        }
        Command::Stats => println!("{}", output::format_overview(&app.overview()?)),
        Command::Export { path } => {
            let bundle = app.export()?;
            let path = path.unwrap_or_else(|| bundle.file_name());
            std::fs::write(&path, bundle.to_json_pretty()?)
                .with_context(|| format!("Failed to write {}", path))?;
            println!("Exported {} destinations to {}.", bundle.destinations.len(), path);
        }
        Command::Import { path } => {
            let contents =
                std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
            let count = app.import(&contents)?;
            println!("Imported {} destinations.", count);
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}
