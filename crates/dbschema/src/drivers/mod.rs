//! Catalog driver implementations.
//!
//! This module provides dialect-specific implementations of the core traits:
//!
//! - [`mysql`]: MySQL/MariaDB (`INFORMATION_SCHEMA`)
//! - [`sqlite`]: SQLite (`PRAGMA`)
//! - [`common`]: Shared utilities (name-list filters)
//!
//! # Architecture
//!
//! Each driver module provides:
//! - a `CatalogStrategy`: the catalog queries and row normalization
//! - a `CatalogConnection` adapter over a sqlx connection, behind the
//!   driver's cargo feature
//!
//! # Adding New Databases
//!
//! 1. Create a new module under `drivers/`
//! 2. Implement `CatalogStrategy` (and a `CatalogConnection` adapter)
//! 3. Add an enum variant to `StrategyImpl` and a name to `for_driver`
//! 4. Gate the adapter with a feature flag in `Cargo.toml`

pub mod common;
pub mod mysql;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

pub use mysql::MysqlStrategy;
pub use sqlite::SqliteStrategy;

#[cfg(feature = "mysql")]
pub use mysql::MysqlCatalogConnection;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteCatalogConnection;

use async_trait::async_trait;

use crate::config::{ConnectionConfig, IntrospectionConfig};
use crate::core::schema::{Column, Schema, Table};
use crate::core::traits::{CatalogConnection, CatalogStrategy};
use crate::error::{Result, SchemaError};

/// Enum-based static dispatch for catalog strategies.
///
/// The set of dialects is closed, so selection is a match on the driver name
/// and every call is a match instead of a vtable lookup.
#[derive(Debug, Clone)]
pub enum StrategyImpl {
    Mysql(MysqlStrategy),
    Sqlite(SqliteStrategy),
}

impl StrategyImpl {
    /// Select the strategy for a connection's driver name.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownDialect`] if the driver is not recognized.
    pub fn for_driver(driver: &str) -> Result<Self> {
        Self::for_driver_with(driver, &IntrospectionConfig::default())
    }

    /// Select the strategy for a driver name, applying introspection settings.
    pub fn for_driver_with(driver: &str, config: &IntrospectionConfig) -> Result<Self> {
        match driver.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(StrategyImpl::Mysql(
                MysqlStrategy::new().with_version_comparison(config.version_comparison),
            )),
            "sqlite" | "sqlite3" => Ok(StrategyImpl::Sqlite(SqliteStrategy::new())),
            other => Err(SchemaError::UnknownDialect(other.to_string())),
        }
    }
}

/// Open a catalog connection for a connection config.
///
/// The driver is chosen by `config.type`; a driver whose cargo feature is
/// disabled is reported as a configuration error.
pub async fn connect(config: &ConnectionConfig) -> Result<Box<dyn CatalogConnection>> {
    match StrategyImpl::for_driver(&config.r#type)? {
        #[cfg(feature = "mysql")]
        StrategyImpl::Mysql(_) => Ok(Box::new(
            mysql::MysqlCatalogConnection::connect(config).await?,
        )),
        #[cfg(feature = "sqlite")]
        StrategyImpl::Sqlite(_) => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| SchemaError::Config("connection.path is required for sqlite".into()))?;
            let conn = if path == ":memory:" {
                sqlite::SqliteCatalogConnection::connect("sqlite::memory:").await?
            } else {
                sqlite::SqliteCatalogConnection::open(path).await?
            };
            Ok(Box::new(conn))
        }
        #[allow(unreachable_patterns)]
        other => Err(SchemaError::Config(format!(
            "Driver '{}' is not enabled in this build",
            other.name()
        ))),
    }
}

#[async_trait]
impl CatalogStrategy for StrategyImpl {
    fn name(&self) -> &str {
        match self {
            StrategyImpl::Mysql(s) => s.name(),
            StrategyImpl::Sqlite(s) => s.name(),
        }
    }

    async fn query_schemas(
        &self,
        conn: &mut dyn CatalogConnection,
        schemas: Option<&[String]>,
    ) -> Result<Vec<Schema>> {
        match self {
            StrategyImpl::Mysql(s) => s.query_schemas(conn, schemas).await,
            StrategyImpl::Sqlite(s) => s.query_schemas(conn, schemas).await,
        }
    }

    async fn query_tables(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        tables: Option<&[String]>,
    ) -> Result<Vec<Table>> {
        match self {
            StrategyImpl::Mysql(s) => s.query_tables(conn, schema, tables).await,
            StrategyImpl::Sqlite(s) => s.query_tables(conn, schema, tables).await,
        }
    }

    async fn query_columns(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        table: &Table,
        columns: Option<&[String]>,
    ) -> Result<Vec<Column>> {
        match self {
            StrategyImpl::Mysql(s) => s.query_columns(conn, schema, table, columns).await,
            StrategyImpl::Sqlite(s) => s.query_columns(conn, schema, table, columns).await,
        }
    }
}
