//! SQLite-backed record store.
//!
//! # Responsibility
//! - Keep SQL for the `todos` table inside the store boundary.
//! - Run every statement on tokio's blocking pool.
//! - Publish the refreshed list after each committed mutation.
//!
//! # Invariants
//! - One connection, guarded by a mutex: writers are serialized.
//! - Publication happens while the connection lock is held, so emissions
//!   follow commit order.

use super::{StoreError, StoreResult, TodoStore, TodoSubscription};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::{open_db, open_db_in_memory};
use crate::model::todo::{Todo, TodoId};
use async_trait::async_trait;
use log::{debug, error};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

const TODO_TABLE: &str = "todos";
const TODO_COLUMNS: &[&str] = &["id", "title", "description", "date"];

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    date
FROM todos
ORDER BY id ASC;";

/// Record store over a single SQLite connection.
///
/// Cheap to clone; clones share the connection and the live sequence.
#[derive(Clone)]
pub struct SqliteTodoStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    conn: Mutex<Connection>,
    live: watch::Sender<Vec<Todo>>,
}

impl SqliteTodoStore {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps a connection that already went through `db::open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema
    ///   does not carry the `todos` layout.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        ensure_schema(&conn)?;
        let todos = query_all(&conn)?;
        let (live, _) = watch::channel(todos);

        Ok(Self {
            inner: Arc::new(StoreInner {
                conn: Mutex::new(conn),
                live,
            }),
        })
    }

    async fn run_blocking<T, F>(&self, op: &'static str, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreInner) -> StoreResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let started_at = Instant::now();

        let result = tokio::task::spawn_blocking(move || work(&inner))
            .await
            .map_err(|err| StoreError::Background(err.to_string()))
            .and_then(|result| result);

        match &result {
            Ok(_) => debug!(
                "event=store_{} module=store status=ok duration_ms={}",
                op,
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=store_{} module=store status=error duration_ms={} error={}",
                op,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

impl StoreInner {
    fn publish(&self, conn: &Connection) -> StoreResult<()> {
        let todos = query_all(conn)?;
        self.live.send_replace(todos);
        Ok(())
    }

    fn insert(&self, todo: &Todo) -> StoreResult<TodoId> {
        let conn = self.conn.lock();
        let id = match todo.id {
            Some(id) => {
                conn.execute(
                    "INSERT OR REPLACE INTO todos (id, title, description, date)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![id, todo.title, todo.description, todo.created_at],
                )?;
                id
            }
            None => {
                conn.execute(
                    "INSERT INTO todos (title, description, date) VALUES (?1, ?2, ?3);",
                    params![todo.title, todo.description, todo.created_at],
                )?;
                conn.last_insert_rowid()
            }
        };
        self.publish(&conn)?;
        Ok(id)
    }

    fn update(&self, todo: &Todo) -> StoreResult<()> {
        let conn = self.conn.lock();
        if let Some(id) = todo.id {
            conn.execute(
                "UPDATE todos
                 SET
                    title = ?1,
                    description = ?2,
                    date = ?3
                 WHERE id = ?4;",
                params![todo.title, todo.description, todo.created_at, id],
            )?;
        }
        self.publish(&conn)
    }

    fn delete(&self, todo: &Todo) -> StoreResult<()> {
        let conn = self.conn.lock();
        if let Some(id) = todo.id {
            conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        }
        self.publish(&conn)
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    fn observe_all(&self) -> TodoSubscription {
        TodoSubscription::new(self.inner.live.subscribe())
    }

    async fn insert(&self, todo: Todo) -> StoreResult<TodoId> {
        self.run_blocking("insert", move |inner| inner.insert(&todo)).await
    }

    async fn update(&self, todo: Todo) -> StoreResult<()> {
        self.run_blocking("update", move |inner| inner.update(&todo)).await
    }

    async fn delete(&self, todo: Todo) -> StoreResult<()> {
        self.run_blocking("delete", move |inner| inner.delete(&todo)).await
    }
}

fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [TODO_TABLE],
            |row| row.get(0),
        )
        .optional()?;
    if table.is_none() {
        return Err(StoreError::MissingRequiredTable(TODO_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([TODO_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in TODO_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: TODO_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn query_all(conn: &Connection) -> StoreResult<Vec<Todo>> {
    let mut stmt = conn.prepare_cached(TODO_SELECT_SQL)?;
    let mut rows = stmt.query([])?;
    let mut todos = Vec::new();

    while let Some(row) = rows.next()? {
        todos.push(parse_todo_row(row)?);
    }

    Ok(todos)
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    Ok(Todo {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("date")?,
    })
}
