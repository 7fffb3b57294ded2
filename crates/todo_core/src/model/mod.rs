//! Domain model for to-do records.
//!
//! # Responsibility
//! - Define the canonical record passed between store, state holder and view.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `TodoId`.

pub mod todo;
