//! sqlx-backed catalog connection for MySQL/MariaDB.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow, MySqlSslMode};
use sqlx::{Column as _, Connection, Row, ValueRef};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ConnectionConfig;
use crate::core::traits::{CatalogConnection, CatalogRow, CatalogValue};
use crate::error::{Result, SchemaError};

/// A single MySQL connection used for catalog reads.
pub struct MysqlCatalogConnection {
    conn: MySqlConnection,
    id: String,
    version: Option<String>,
}

impl MysqlCatalogConnection {
    /// Connect using the fields of a connection config.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(&config.password)
            .ssl_mode(MySqlSslMode::Preferred);

        let conn = Self::connect_with(options).await?;
        info!(
            "Connected to MySQL: {}:{}/{}",
            config.host, config.port, config.database
        );
        Ok(conn)
    }

    /// Connect with explicit sqlx options.
    pub async fn connect_with(options: MySqlConnectOptions) -> Result<Self> {
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| SchemaError::database(e, "connecting to MySQL"))?;

        Ok(Self {
            conn,
            id: Uuid::new_v4().to_string(),
            version: None,
        })
    }

    /// Close the connection gracefully.
    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .map_err(|e| SchemaError::database(e, "closing MySQL connection"))
    }

    fn decode_row(row: &MySqlRow) -> CatalogRow {
        let mut out = CatalogRow::new();
        for (i, column) in row.columns().iter().enumerate() {
            out.push(column.name(), Self::decode_value(row, i));
        }
        out
    }

    fn decode_value(row: &MySqlRow, idx: usize) -> CatalogValue {
        let is_null = row.try_get_raw(idx).map(|r| r.is_null()).unwrap_or(true);
        if is_null {
            return CatalogValue::Null;
        }

        // Catalog queries CAST every column to CHAR or SIGNED.
        if let Ok(v) = row.try_get::<i64, _>(idx) {
            return CatalogValue::Integer(v);
        }
        if let Ok(v) = row.try_get::<String, _>(idx) {
            return CatalogValue::Text(v);
        }
        row.try_get::<Vec<u8>, _>(idx)
            .map(|b| CatalogValue::Text(String::from_utf8_lossy(&b).into_owned()))
            .unwrap_or(CatalogValue::Null)
    }
}

#[async_trait]
impl CatalogConnection for MysqlCatalogConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    fn connection_id(&self) -> &str {
        &self.id
    }

    async fn server_version(&mut self) -> Result<String> {
        if let Some(version) = &self.version {
            return Ok(version.clone());
        }

        let version: String = sqlx::query_scalar("SELECT CAST(VERSION() AS CHAR)")
            .fetch_one(&mut self.conn)
            .await
            .map_err(|e| SchemaError::database(e, "reading MySQL server version"))?;

        debug!("MySQL server version: {}", version);
        self.version = Some(version.clone());
        Ok(version)
    }

    async fn fetch_all(&mut self, query: &str, params: &[String]) -> Result<Vec<CatalogRow>> {
        let mut q = sqlx::query(query);
        for param in params {
            q = q.bind(param.as_str());
        }

        let rows: Vec<MySqlRow> = q
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| SchemaError::database(e, "querying MySQL catalog"))?;

        Ok(rows.iter().map(Self::decode_row).collect())
    }
}
