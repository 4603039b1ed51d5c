//! # dbschema
//!
//! Relational database schema introspection.
//!
//! This library reads a database's system catalog and materializes one schema
//! as an immutable object graph (schema -> tables -> columns) with normalized,
//! engine-agnostic column attributes:
//!
//! - **Normalized types**: lowercase data type, unsigned/zerofill flags,
//!   enum/set options, precision and scale
//! - **Derived bounds**: minimum/maximum representable values, exact decimal
//!   boundaries, integer display widths
//! - **Two catalog dialects**: MySQL/MariaDB `INFORMATION_SCHEMA` and SQLite
//!   `PRAGMA` introspection
//! - **Schema cache** keyed by connection identity
//!
//! ## Example
//!
//! ```rust,no_run
//! use dbschema::{connect, fetch_schema, Config};
//!
//! #[tokio::main]
//! async fn main() -> dbschema::Result<()> {
//!     let config = Config::load("config.yaml")?;
//!     let mut conn = connect(&config.connection).await?;
//!     if let Some(schema) = fetch_schema(conn.as_mut(), "shop").await? {
//!         for table in schema.tables() {
//!             println!("{} ({} columns)", table.full_name(), table.columns().count());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod bounds;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig, IntrospectionConfig};
pub use crate::core::{
    fetch_schema, fetch_schema_with, list_schemas, CatalogConnection, CatalogRow,
    CatalogStrategy, CatalogValue, Column, ColumnRef, Schema, SchemaManager, Table, TableRef,
};
pub use drivers::mysql::VersionComparison;
pub use drivers::{connect, StrategyImpl};
pub use error::{Result, SchemaError};

#[cfg(feature = "mysql")]
pub use drivers::MysqlCatalogConnection;
#[cfg(feature = "sqlite")]
pub use drivers::SqliteCatalogConnection;
