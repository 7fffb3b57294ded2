//! Repository layer.
//!
//! # Responsibility
//! - Expose the record store to the presentation layer behind one façade.
//! - Keep presentation code independent of the storage implementation.

pub mod todo_repository;
