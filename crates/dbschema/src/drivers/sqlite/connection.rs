//! sqlx-backed catalog connection for SQLite.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column as _, Connection, Row, TypeInfo, ValueRef};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::traits::{CatalogConnection, CatalogRow, CatalogValue};
use crate::error::{Result, SchemaError};

/// A single SQLite connection used for catalog reads.
pub struct SqliteCatalogConnection {
    conn: SqliteConnection,
    id: String,
    version: Option<String>,
}

impl SqliteCatalogConnection {
    /// Open a database file read-only. The file must exist.
    pub async fn open(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false);

        let conn = Self::connect_with(options).await?;
        info!("Opened SQLite database: {}", path);
        Ok(conn)
    }

    /// Connect from a `sqlite:` URL (e.g. `sqlite::memory:`, `sqlite://app.db`).
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchemaError::Config(format!("Invalid SQLite URL '{}': {}", url, e)))?;
        Self::connect_with(options).await
    }

    /// Connect with explicit sqlx options.
    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self> {
        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| SchemaError::database(e, "opening SQLite database"))?;

        Ok(Self {
            conn,
            id: Uuid::new_v4().to_string(),
            version: None,
        })
    }

    /// Run a statement outside the catalog contract (setup, `ATTACH`).
    pub async fn execute(&mut self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map_err(|e| SchemaError::database(e, "executing SQLite statement"))?;
        Ok(())
    }

    /// Close the connection gracefully.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| SchemaError::database(e, "closing SQLite connection"))
    }

    fn decode_row(row: &SqliteRow) -> CatalogRow {
        let mut out = CatalogRow::new();
        for (i, column) in row.columns().iter().enumerate() {
            out.push(column.name(), Self::decode_value(row, i));
        }
        out
    }

    fn decode_value(row: &SqliteRow, idx: usize) -> CatalogValue {
        // Storage class of the value itself; pragma columns have no declared type.
        let storage = match row.try_get_raw(idx) {
            Ok(value) if !value.is_null() => value.type_info().name().to_string(),
            _ => return CatalogValue::Null,
        };

        match storage.as_str() {
            "INTEGER" | "BOOLEAN" => row
                .try_get_unchecked::<i64, _>(idx)
                .map(CatalogValue::Integer)
                .unwrap_or(CatalogValue::Null),
            "REAL" => row
                .try_get_unchecked::<f64, _>(idx)
                .map(|v| CatalogValue::Text(v.to_string()))
                .unwrap_or(CatalogValue::Null),
            "BLOB" => row
                .try_get_unchecked::<Vec<u8>, _>(idx)
                .map(|b| CatalogValue::Text(String::from_utf8_lossy(&b).into_owned()))
                .unwrap_or(CatalogValue::Null),
            _ => row
                .try_get_unchecked::<String, _>(idx)
                .map(CatalogValue::Text)
                .unwrap_or(CatalogValue::Null),
        }
    }
}

#[async_trait]
impl CatalogConnection for SqliteCatalogConnection {
    fn driver_name(&self) -> &str {
        "sqlite"
    }

    fn connection_id(&self) -> &str {
        &self.id
    }

    async fn server_version(&mut self) -> Result<String> {
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }

        let version: String = sqlx::query_scalar("SELECT sqlite_version()")
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| SchemaError::database(e, "reading SQLite version"))?;

        debug!("SQLite version: {}", version);
        self.version = Some(version.clone());
        Ok(version)
    }

    async fn fetch_all(&mut self, query: &str, params: &[String]) -> Result<Vec<CatalogRow>> {
        let mut q = sqlx::query(query);
        for param in params {
            q = q.bind(param.as_str());
        }

        let rows: Vec<SqliteRow> = q
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| SchemaError::database(e, "querying SQLite catalog"))?;

        Ok(rows.iter().map(Self::decode_row).collect())
    }
}
