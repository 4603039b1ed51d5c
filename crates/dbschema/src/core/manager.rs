//! Schema cache keyed by connection identity and schema name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::config::IntrospectionConfig;
use crate::error::Result;

use super::assembly::fetch_schema_with;
use super::schema::Schema;
use super::traits::CatalogConnection;

type CacheKey = (String, String);

/// Fetches schemas and caches them per (connection, schema name).
///
/// Cached schemas are shared as `Arc<Schema>`; a repeated `get_schema` for
/// the same key returns the same allocation until [`clear_cache`] drops it.
/// Schemas that were not found are not cached.
///
/// [`clear_cache`]: SchemaManager::clear_cache
#[derive(Debug, Default)]
pub struct SchemaManager {
    introspection: IntrospectionConfig,
    cache: RwLock<HashMap<CacheKey, Arc<Schema>>>,
}

impl SchemaManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(introspection: IntrospectionConfig) -> Self {
        Self {
            introspection,
            cache: RwLock::default(),
        }
    }

    /// Return the cached schema, fetching it on a miss.
    pub async fn get_schema(
        &self,
        conn: &mut dyn CatalogConnection,
        schema_name: &str,
    ) -> Result<Option<Arc<Schema>>> {
        if let Some(schema) = self.cached_schema(conn.connection_id(), schema_name) {
            debug!("Schema cache hit: {}", schema_name);
            return Ok(Some(schema));
        }

        let Some(schema) = fetch_schema_with(conn, schema_name, &self.introspection).await? else {
            return Ok(None);
        };

        let key = (conn.connection_id().to_string(), schema_name.to_string());
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // A concurrent fetch may have filled the slot; keep the first entry.
        let cached = cache.entry(key).or_insert_with(|| Arc::new(schema));
        Ok(Some(Arc::clone(cached)))
    }

    /// Cached schema for a key, without touching the database.
    pub fn cached_schema(&self, connection_id: &str, schema_name: &str) -> Option<Arc<Schema>> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        cache
            .get(&(connection_id.to_string(), schema_name.to_string()))
            .cloned()
    }

    /// Drop cached schemas: one connection's entries, or all of them.
    pub fn clear_cache(&self, connection_id: Option<&str>) {
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        match connection_id {
            Some(id) => cache.retain(|(conn_id, _), _| conn_id != id),
            None => cache.clear(),
        }
    }

    /// Number of cached schemas.
    pub fn cached_count(&self) -> usize {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
