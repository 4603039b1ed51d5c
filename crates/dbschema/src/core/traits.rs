//! Core traits for catalog introspection.
//!
//! - [`CatalogConnection`]: a live connection that can run parameterized read
//!   queries against the system catalog
//! - [`CatalogStrategy`]: a dialect-specific way of walking the catalog into a
//!   [`Schema`]
//!
//! Rows come back as [`CatalogRow`]s: ordered name -> value mappings with
//! typed accessors, so strategies never touch driver row types.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Result, SchemaError};

use super::schema::{Column, Schema, Table};

/// A single value read from a catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValue {
    Null,
    Integer(i64),
    Text(String),
}

impl CatalogValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CatalogValue::Null)
    }

    /// Text representation; integers are rendered in decimal.
    pub fn as_string(&self) -> Option<String> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Integer(v) => Some(v.to_string()),
            CatalogValue::Text(s) => Some(s.clone()),
        }
    }

    /// Integer value; numeric text is parsed, anything else is `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CatalogValue::Null => None,
            CatalogValue::Integer(v) => Some(*v),
            CatalogValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&str> for CatalogValue {
    fn from(v: &str) -> Self {
        CatalogValue::Text(v.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(v: String) -> Self {
        CatalogValue::Text(v)
    }
}

impl From<i64> for CatalogValue {
    fn from(v: i64) -> Self {
        CatalogValue::Integer(v)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CatalogValue::Null)
    }
}

/// One row returned by a catalog query, in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogRow {
    fields: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field (builder style).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CatalogValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Set a field. An existing field of the same name keeps its position
    /// and takes the new value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<CatalogValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Raw value by field name. Missing fields read as `None`.
    pub fn get(&self, name: &str) -> Option<&CatalogValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Nullable text field.
    pub fn opt_str(&self, name: &str) -> Option<String> {
        self.get(name).and_then(CatalogValue::as_string)
    }

    /// Nullable integer field.
    pub fn opt_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(CatalogValue::as_i64)
    }

    /// Required non-null text field.
    pub fn require_str(&self, name: &str, context: &str) -> Result<String> {
        self.opt_str(name)
            .ok_or_else(|| SchemaError::missing_field(name, context))
    }

    /// Text field where NULL reads as the empty string.
    pub fn str_or_empty(&self, name: &str) -> String {
        self.opt_str(name).unwrap_or_default()
    }

    /// Field names in select-list order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A live database connection used for catalog reads.
///
/// Methods take `&mut self`: a connection serves one query at a time, so two
/// concurrent fetches on the same connection are rejected at compile time.
/// Errors are returned as produced by the driver; callers decide whether to
/// retry.
#[async_trait]
pub trait CatalogConnection: Send {
    /// Driver identifier, e.g. "mysql" or "sqlite".
    fn driver_name(&self) -> &str;

    /// Stable identity of this connection, used as a cache key.
    fn connection_id(&self) -> &str;

    /// Server version string as reported by the engine.
    async fn server_version(&mut self) -> Result<String>;

    /// Prepare and execute a read query with positional `?` parameters.
    async fn fetch_all(&mut self, query: &str, params: &[String]) -> Result<Vec<CatalogRow>>;
}

/// A dialect-specific catalog walk.
///
/// Implementors answer three listing queries; [`fetch_schema`] combines them
/// into a linked graph. Each listing takes an optional name filter:
/// `None` lists everything, `Some(&[])` lists nothing.
///
/// [`fetch_schema`]: CatalogStrategy::fetch_schema
#[async_trait]
pub trait CatalogStrategy: Send + Sync {
    /// Dialect identifier (e.g. "mysql", "sqlite").
    fn name(&self) -> &str;

    /// List schemas (without tables), ordered by name.
    async fn query_schemas(
        &self,
        conn: &mut dyn CatalogConnection,
        schemas: Option<&[String]>,
    ) -> Result<Vec<Schema>>;

    /// List the base tables of `schema` (without columns), ordered by name.
    async fn query_tables(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        tables: Option<&[String]>,
    ) -> Result<Vec<Table>>;

    /// List the columns of `table` in ordinal order.
    async fn query_columns(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        table: &Table,
        columns: Option<&[String]>,
    ) -> Result<Vec<Column>>;

    /// Fetch a fully linked schema, or `None` if the catalog has no schema
    /// with that exact name.
    ///
    /// Queries run one after another on `conn`: the schema row, its tables,
    /// then each table's columns.
    async fn fetch_schema(
        &self,
        conn: &mut dyn CatalogConnection,
        schema_name: &str,
    ) -> Result<Option<Schema>> {
        let filter = [schema_name.to_string()];
        let Some(mut schema) = self
            .query_schemas(conn, Some(filter.as_slice()))
            .await?
            .into_iter()
            .find(|s| s.name == schema_name)
        else {
            debug!("[{}] Schema {} not found", self.name(), schema_name);
            return Ok(None);
        };

        let tables = self.query_tables(conn, &schema, None).await?;
        let mut column_count = 0;

        for mut table in tables {
            let columns = self.query_columns(conn, &schema, &table, None).await?;
            column_count += columns.len();
            for column in columns {
                table.push_column(column)?;
            }
            schema.push_table(table)?;
        }

        info!(
            "[{}] Loaded schema {}: {} tables, {} columns",
            self.name(),
            schema.name,
            schema.table_count(),
            column_count
        );

        Ok(Some(schema))
    }
}
