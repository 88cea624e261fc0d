//! # TaskNet Workspace Search
//!
//! Enterprise search across the five TaskNet Workspace content kinds:
//! notes, tasks, projects, wikis and documents.
//!
//! One query fans out to every enabled table, each hit is scored on a
//! single normalized scale, and the aggregated list is faceted by type and
//! tag, ranked by score then recency, and truncated to the caller's limit.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────┐
//! │ SqliteStore  │──▶│       tasknet-core       │
//! │ InMemoryStore│   │ score · excerpt · facets │
//! └──────────────┘   │ rank · search            │
//!                    └────────────┬─────────────┘
//!                       ┌─────────┴─────────┐
//!                       ▼                   ▼
//!                  ┌──────────┐       ┌──────────┐
//!                  │   CLI    │       │   HTTP   │
//!                  │(tasknet) │       │ /search  │
//!                  └──────────┘       └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tasknet init                          # create database
//! tasknet import workspace.json         # load a snapshot
//! tasknet search "budget" --type tasks
//! tasknet serve                         # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | Tracing subscriber setup |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema creation |
//! | [`sqlite_store`] | SQLite search backend |
//! | [`search`] | CLI search and the shared search entry point |
//! | [`server`] | HTTP server |
//! | [`export`] / [`import`] | Snapshot export and import |
//! | [`stats`] | Table counts |

pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod logging;
pub mod migrate;
pub mod search;
pub mod server;
pub mod sqlite_store;
pub mod stats;

pub use tasknet_core::models;
