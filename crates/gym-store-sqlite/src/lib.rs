//! SQLite backend for the gym store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each module below holds the
//! synchronous queries for one area; [`SqliteStore`] drives them.

mod catalog;
mod clients;
mod encode;
mod enrollment;
mod ledger;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
