//! To-do repository.
//!
//! # Responsibility
//! - Give callers a single data-access entry point for to-do records.
//! - Delegate every call to the record store unchanged.
//!
//! # Invariants
//! - No caching, transformation or validation happens here.
//! - Store errors are returned as-is.

use crate::model::todo::{Todo, TodoId};
use crate::store::{StoreResult, TodoStore, TodoSubscription};

/// Data-access façade over a record store implementation.
pub struct TodoRepository<S: TodoStore> {
    store: S,
}

impl<S: TodoStore> TodoRepository<S> {
    /// Creates a repository using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Live sequence over the full list.
    pub fn observe_all(&self) -> TodoSubscription {
        self.store.observe_all()
    }

    pub async fn insert(&self, todo: Todo) -> StoreResult<TodoId> {
        self.store.insert(todo).await
    }

    pub async fn update(&self, todo: Todo) -> StoreResult<()> {
        self.store.update(todo).await
    }

    pub async fn delete(&self, todo: Todo) -> StoreResult<()> {
        self.store.delete(todo).await
    }
}
