//! Core abstractions for database-agnostic introspection.
//!
//! - [`schema`]: Schema, table and column metadata types
//! - [`traits`]: Catalog connection and strategy traits
//! - [`assembly`]: Strategy selection and the schema -> tables -> columns walk
//! - [`manager`]: Schema cache keyed by connection identity
//! - [`identifier`]: Identifier validation and quoting
//!
//! # Architecture
//!
//! The core module defines database-agnostic abstractions that are implemented
//! by driver modules (`drivers/mysql`, `drivers/sqlite`). Core logic is tested
//! against an in-memory connection; drivers only add queries and row
//! normalization.
//!
//! # Design Patterns
//!
//! - **Strategy**: `CatalogStrategy` implementations per catalog dialect
//! - **Template Method**: `CatalogStrategy::fetch_schema` walks the catalog
//!   through the dialect's listing queries

pub mod assembly;
pub mod identifier;
pub mod manager;
pub mod schema;
pub mod traits;

// Re-export commonly used types for convenience
pub use assembly::{fetch_schema, fetch_schema_with, list_schemas};
pub use manager::SchemaManager;
pub use schema::{Column, ColumnRef, Schema, Table, TableRef};
pub use traits::{CatalogConnection, CatalogRow, CatalogStrategy, CatalogValue};
