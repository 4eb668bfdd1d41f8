//! Interactive todo list.
//!
//! Reads one command per line from stdin and redraws the list on stdout
//! whenever it changes. Logs go to stderr; set `RUST_LOG` or
//! `TODO_LOG_LEVEL` to see them.

use anyhow::Context;
use std::io::Write;
use std::sync::Arc;
use todo::command::{self, Command, USAGE};
use todo::config::Config;
use todo::{open_store, view, FileKeyValueStore, PersistFailure, TodoEnvironment, TodoStore};
use todolist_core::state::Revision;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// What the screen showed when it was last drawn
type Drawn = (Revision, Option<PersistFailure>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        data_dir = %config.storage.data_dir.display(),
        namespace = %config.storage.namespace,
        "Starting todo"
    );

    let storage = Arc::new(FileKeyValueStore::new(&config.storage.data_dir));
    let store = open_store(TodoEnvironment::production(storage, &config.storage.namespace)).await;

    let mut drawn: Option<Drawn> = None;
    redraw_if_dirty(&store, &mut drawn).await;
    println!("Type `help` for commands.");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match command::parse(&line) {
            Ok(None) => {},
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{USAGE}"),
            Ok(Some(Command::List)) => drawn = None,
            Ok(Some(cmd)) => match store.state(move |s| cmd.into_action(s)).await {
                Ok(Some(action)) => {
                    tracing::debug!(?action, "Dispatching");
                    store.send(action).await?.wait().await;
                },
                Ok(None) => {},
                Err(error) => println!("{error}"),
            },
            Err(error) => println!("{error}\n\n{USAGE}"),
        }

        redraw_if_dirty(&store, &mut drawn).await;
        prompt();
    }

    if let Err(error) = store.shutdown(config.shutdown_timeout()).await {
        tracing::warn!(%error, "Exiting with unsaved changes");
        eprintln!("warning: {error}; recent changes may not have been saved");
    }

    Ok(())
}

/// Prints the list if its revision or error line changed since the last draw
async fn redraw_if_dirty(store: &TodoStore, drawn: &mut Option<Drawn>) {
    let (current, screen) = store
        .state(|s| ((s.revision(), s.last_error.clone()), view::render(s)))
        .await;

    if drawn.as_ref() != Some(&current) {
        println!("\n{screen}");
        *drawn = Some(current);
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
