//! # TaskNet Core
//!
//! Shared search logic for TaskNet Workspace: record models, the
//! [`Store`](store::Store) abstraction, the unified scorer, excerpt
//! generation, faceting, ranking and the search orchestrator.
//!
//! This crate contains no tokio, sqlx or filesystem dependencies. The
//! SQLite backend lives in the application crate; the in-memory backend
//! in [`store::memory`] serves tests and the offline mirror.

pub mod excerpt;
pub mod facets;
pub mod models;
pub mod rank;
pub mod score;
pub mod search;
pub mod store;
pub mod text;
