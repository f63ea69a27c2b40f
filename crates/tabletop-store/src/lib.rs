//! # tabletop-store
//!
//! Relational storage for the campaign manager, backed by SQLite.
//!
//! The crate exposes a [`Store`] that runs migrations once and hands out
//! short-lived [`Database`] connections, one per unit of work. `Database`
//! wraps a `rusqlite::Connection` and carries typed CRUD helpers for every
//! domain model. Multi-row writes run inside a single transaction.

pub mod campaigns;
pub mod catalog;
pub mod characters;
pub mod database;
pub mod migrations;
pub mod models;
pub mod roles;
pub mod sheet;
pub mod users;

mod error;

pub use database::{Database, Store};
pub use error::{Result, StoreError};
pub use models::*;
