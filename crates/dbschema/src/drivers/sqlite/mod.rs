//! SQLite catalog driver.
//!
//! - [`SqliteStrategy`]: `PRAGMA`/`sqlite_master` catalog walk
//! - [`SqliteCatalogConnection`]: sqlx connection adapter (feature `sqlite`)
//!
//! # Connection String
//!
//! ```text
//! sqlite://path/to/app.db
//! sqlite::memory:
//! ```

#[cfg(feature = "sqlite")]
mod connection;
mod strategy;

#[cfg(feature = "sqlite")]
pub use connection::SqliteCatalogConnection;
pub use strategy::{value_bounds, SqliteStrategy, SQLITE_MAX_LENGTH};
