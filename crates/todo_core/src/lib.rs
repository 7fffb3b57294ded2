//! Core of the local to-do list.
//! Storage, data access and presentation state live here; front ends only
//! render and forward user input.

pub mod db;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod repo;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{format_timestamp, now_timestamp, Todo, TodoId, TIMESTAMP_FORMAT};
pub use presentation::state_holder::TodoStateHolder;
pub use repo::todo_repository::TodoRepository;
pub use store::{SqliteTodoStore, StoreError, StoreResult, TodoStore, TodoSubscription};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
