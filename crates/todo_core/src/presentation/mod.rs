//! Presentation layer shared by front ends.
//!
//! # Responsibility
//! - Bridge the repository's live list to whatever renders it.
//! - Own the background work triggered by user mutations.

pub mod state_holder;
