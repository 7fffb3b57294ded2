//! Record store: the durable `todos` table and its live read.
//!
//! # Responsibility
//! - Define the store contract consumed by the repository layer.
//! - Provide the live-sequence handle every reader subscribes through.
//!
//! # Invariants
//! - Every successful insert/update/delete is followed by a fresh emission
//!   of the full, id-ordered list.
//! - Update/delete of an unknown or unassigned id is a silent no-op.
//! - Storage faults are returned to the caller, never swallowed.

mod sqlite_store;

pub use sqlite_store::SqliteTodoStore;

use crate::db::DbError;
use crate::model::todo::{Todo, TodoId};
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::watch;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure raised by a record store operation.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// The blocking worker running the statement failed or was cancelled.
    Background(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it through db::open_db first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::Background(message) => write!(f, "background store task failed: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::Background(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Contract for the durable to-do table.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Opens a live sequence over the full list.
    fn observe_all(&self) -> TodoSubscription;
    /// Inserts `todo`, assigning an id when absent and replacing on id conflict.
    async fn insert(&self, todo: Todo) -> StoreResult<TodoId>;
    /// Replaces the row with `todo.id`; no-op when no such row exists.
    async fn update(&self, todo: Todo) -> StoreResult<()>;
    /// Removes the row with `todo.id`; no-op when no such row exists.
    async fn delete(&self, todo: Todo) -> StoreResult<()>;
}

/// Receiving end of a live list.
///
/// Always holds the latest published list. Intermediate lists may be
/// skipped by a reader that falls behind; the newest one never is.
#[derive(Debug, Clone)]
pub struct TodoSubscription {
    rx: watch::Receiver<Vec<Todo>>,
}

impl TodoSubscription {
    /// Wraps the receiving half of a store's publication channel.
    pub fn new(rx: watch::Receiver<Vec<Todo>>) -> Self {
        Self { rx }
    }

    /// Returns the latest list without waiting.
    pub fn current(&self) -> Vec<Todo> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published list.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<Vec<Todo>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Resolves with the first list, current or future, matching `predicate`.
    ///
    /// Returns `None` when the publisher goes away before a match.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&[Todo]) -> bool,
    ) -> Option<Vec<Todo>> {
        self.rx
            .wait_for(|todos| predicate(todos.as_slice()))
            .await
            .ok()
            .map(|todos| todos.to_vec())
    }
}
