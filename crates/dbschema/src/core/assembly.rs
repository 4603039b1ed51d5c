//! Schema assembly: strategy selection plus the catalog walk.

use tracing::debug;

use crate::config::IntrospectionConfig;
use crate::drivers::StrategyImpl;
use crate::error::Result;

use super::schema::Schema;
use super::traits::{CatalogConnection, CatalogStrategy};

/// Fetch a fully linked schema with default introspection settings.
///
/// Returns `Ok(None)` when the connection has no schema named `schema_name`.
/// An unrecognized driver fails with
/// [`SchemaError::UnknownDialect`](crate::error::SchemaError::UnknownDialect)
/// before any query is issued.
pub async fn fetch_schema(
    conn: &mut dyn CatalogConnection,
    schema_name: &str,
) -> Result<Option<Schema>> {
    fetch_schema_with(conn, schema_name, &IntrospectionConfig::default()).await
}

/// Fetch a fully linked schema using explicit introspection settings.
pub async fn fetch_schema_with(
    conn: &mut dyn CatalogConnection,
    schema_name: &str,
    config: &IntrospectionConfig,
) -> Result<Option<Schema>> {
    let strategy = StrategyImpl::for_driver_with(conn.driver_name(), config)?;
    debug!(
        "Fetching schema {} via {} strategy (connection {})",
        schema_name,
        strategy.name(),
        conn.connection_id()
    );
    strategy.fetch_schema(conn, schema_name).await
}

/// Names of all schemas visible through the connection, in catalog order.
pub async fn list_schemas(
    conn: &mut dyn CatalogConnection,
    config: &IntrospectionConfig,
) -> Result<Vec<String>> {
    let strategy = StrategyImpl::for_driver_with(conn.driver_name(), config)?;
    let schemas = strategy.query_schemas(conn, None).await?;
    Ok(schemas.into_iter().map(|s| s.name).collect())
}
