//! To-do record model.
//!
//! # Responsibility
//! - Define the single record shape shared by store, state holder and view.
//! - Own timestamp formatting for `created_at`.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one, then never changes.
//! - `created_at` is stamped once at creation and survives every edit.
//! - `title` and `description` may be empty; they are never validated.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type TodoId = i64;

/// Textual layout of `created_at` (local time, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// `None` asks the store to assign a fresh identifier on insert.
    pub id: Option<TodoId>,
    pub title: String,
    pub description: String,
    /// Serialized as `date` to match the persisted column.
    #[serde(rename = "date")]
    pub created_at: String,
}

impl Todo {
    /// Creates an unsaved record stamped with the current local time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_created_at(title, description, now_timestamp())
    }

    /// Creates an unsaved record with a caller-provided timestamp.
    ///
    /// Used by imports and tests where the creation time is already known.
    pub fn with_created_at(
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            created_at: created_at.into(),
        }
    }

    /// Returns a copy with new title and description.
    ///
    /// `id` and `created_at` are carried over unchanged.
    pub fn edited(&self, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: self.id,
            title: title.into(),
            description: description.into(),
            created_at: self.created_at.clone(),
        }
    }

    /// Whether the store has assigned an identifier yet.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Formats a local time the way `created_at` stores it.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time formatted for `created_at`.
pub fn now_timestamp() -> String {
    format_timestamp(Local::now())
}
