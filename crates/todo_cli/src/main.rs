//! `todo` command-line front end.
//!
//! # Responsibility
//! - Read configuration, start logging, and build the store, repository
//!   and state holder once per process.
//! - Drive the interactive view from stdin and the live list.

mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use todo_core::{
    default_log_level, init_logging, SqliteTodoStore, TodoRepository, TodoStateHolder, TodoStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use view::list::render_list;
use view::{Flow, TodoView};

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Local to-do list")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "TODO_DB", default_value = "./todo.sqlite3")]
    db: PathBuf,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long, env = "TODO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current list once and exit.
    List {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        init_logging(&cli.log_level, log_dir)
            .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;
    }

    let store = SqliteTodoStore::open(&cli.db)
        .with_context(|| format!("failed to open todo database {}", cli.db.display()))?;
    info!("event=cli_start module=cli status=ok");

    let repository = Arc::new(TodoRepository::new(store));
    match cli.command {
        Some(Command::List { json }) => {
            print_list(&repository, json, &mut std::io::stdout().lock())
        }
        None => run_interactive(repository).await,
    }
}

/// Writes the current list once, as plain rows or a JSON array.
fn print_list<S: TodoStore>(
    repository: &TodoRepository<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let todos = repository.observe_all().current();
    if json {
        serde_json::to_writer_pretty(&mut *out, &todos).context("failed to encode todos")?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_list(&todos))?;
    }
    Ok(())
}

async fn run_interactive(repository: Arc<TodoRepository<SqliteTodoStore>>) -> Result<()> {
    let holder = TodoStateHolder::new(repository, Handle::current());
    let mut live = holder.todos();
    let mut view = TodoView::new(&holder);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    view.draw(&mut stdout)?;
    let mut needs_prompt = true;
    loop {
        if needs_prompt {
            write!(stdout, "{}", view.prompt())?;
            stdout.flush()?;
        }

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if view.on_input(&line, &mut stdout)? == Flow::Quit {
                    break;
                }
                needs_prompt = true;
            }
            todos = live.next() => {
                let Some(todos) = todos else {
                    break;
                };
                needs_prompt = view.on_list_changed(todos, &mut stdout)?;
            }
        }
    }

    holder.finish_pending().await;
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{print_list, Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;
    use todo_core::{default_log_level, SqliteTodoStore, Todo, TodoRepository};

    #[test]
    fn bare_invocation_uses_defaults() {
        let cli = Cli::try_parse_from(["todo"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("./todo.sqlite3"));
        assert_eq!(cli.log_level, default_log_level());
        assert_eq!(cli.log_dir, None);
        assert!(cli.command.is_none());
    }

    #[test]
    fn list_subcommand_parses_json_flag() {
        let cli = Cli::try_parse_from([
            "todo",
            "--db",
            "other.sqlite3",
            "--log-level",
            "warn",
            "list",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("other.sqlite3"));
        assert_eq!(cli.log_level, "warn");
        assert!(matches!(cli.command, Some(Command::List { json: true })));

        let cli = Cli::try_parse_from(["todo", "list"]).unwrap();
        assert!(matches!(cli.command, Some(Command::List { json: false })));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["todo", "export"]).is_err());
    }

    #[tokio::test]
    async fn list_prints_rows_and_json() {
        let repository = TodoRepository::new(SqliteTodoStore::open_in_memory().unwrap());
        repository
            .insert(Todo::with_created_at("Buy milk", "2%", "2024-01-01 10:00:00"))
            .await
            .unwrap();

        let mut plain = Vec::new();
        print_list(&repository, false, &mut plain).unwrap();
        let plain = String::from_utf8(plain).unwrap();
        assert!(plain.contains("1. Buy milk"));

        let mut json = Vec::new();
        print_list(&repository, true, &mut json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "Buy milk");
        assert_eq!(rows[0]["date"], "2024-01-01 10:00:00");
        assert!(rows[0]["id"].is_i64());
    }

    #[test]
    fn empty_list_prints_empty_json_array() {
        let repository = TodoRepository::new(SqliteTodoStore::open_in_memory().unwrap());
        let mut json = Vec::new();
        print_list(&repository, true, &mut json).unwrap();
        assert_eq!(String::from_utf8(json).unwrap().trim(), "[]");
    }
}
