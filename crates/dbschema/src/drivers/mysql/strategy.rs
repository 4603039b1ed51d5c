//! MySQL/MariaDB catalog strategy (`INFORMATION_SCHEMA`).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::schema::{Column, Schema, Table};
use crate::core::traits::{CatalogConnection, CatalogStrategy};
use crate::drivers::common::sql_in;
use crate::error::Result;

use super::normalize::normalize_column;
use super::version::{ServerVersion, VersionComparison};

/// First server version whose catalog has `COLUMNS.DATETIME_PRECISION`.
const TEMPORAL_PRECISION_SINCE: ServerVersion = ServerVersion::new(5, 6, 4);

/// Strategy for engines exposing `INFORMATION_SCHEMA` (MySQL 5.x/8.x, MariaDB).
#[derive(Debug, Clone, Default)]
pub struct MysqlStrategy {
    version_comparison: VersionComparison,
    /// Set once the missing-precision warning has been logged.
    precision_warned: Arc<AtomicBool>,
}

impl MysqlStrategy {
    /// Create a strategy with the default (componentwise) version comparison.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version_comparison(mut self, comparison: VersionComparison) -> Self {
        self.version_comparison = comparison;
        self
    }

    pub fn version_comparison(&self) -> VersionComparison {
        self.version_comparison
    }

    /// Whether `COLUMNS.DATETIME_PRECISION` can be selected on this server.
    pub async fn supports_temporal_precision(
        &self,
        conn: &mut dyn CatalogConnection,
    ) -> Result<bool> {
        let raw = conn.server_version().await?;
        let version = ServerVersion::parse(&raw);
        let supported = version.is_at_least(TEMPORAL_PRECISION_SINCE, self.version_comparison);

        if !supported {
            // Asked once per table; only the first answer is worth a warning.
            if self.precision_warned.swap(true, Ordering::Relaxed) {
                debug!("Server version {} predates DATETIME_PRECISION", raw);
            } else {
                warn!(
                    "Server version {} ({:?} comparison) predates DATETIME_PRECISION; \
                     temporal precision will be reported as absent",
                    raw, self.version_comparison
                );
            }
        }

        Ok(supported)
    }

    fn columns_query(conditions: &str, temporal_precision: bool) -> String {
        let datetime_precision = if temporal_precision {
            "CAST(`DATETIME_PRECISION` AS SIGNED)"
        } else {
            "NULL"
        };

        format!(
            r#"
            SELECT
                CAST(`COLUMN_NAME` AS CHAR) AS `name`,
                CAST(`COLUMN_DEFAULT` AS CHAR) AS `defaultValue`,
                CAST(`IS_NULLABLE` AS CHAR) AS `nullable`,
                CAST(`DATA_TYPE` AS CHAR) AS `dataType`,
                CAST(`CHARACTER_MAXIMUM_LENGTH` AS SIGNED) AS `maximumLength`,
                CAST(`CHARACTER_SET_NAME` AS CHAR) AS `characterSet`,
                CAST(`COLLATION_NAME` AS CHAR) AS `collation`,
                CAST(`COLUMN_TYPE` AS CHAR) AS `type`,
                CAST(`NUMERIC_PRECISION` AS SIGNED) AS `numericPrecision`,
                CAST(`NUMERIC_SCALE` AS SIGNED) AS `numericScale`,
                {datetime_precision} AS `datetimePrecision`,
                CAST(`EXTRA` AS CHAR) AS `extra`,
                CAST(`COLUMN_COMMENT` AS CHAR) AS `comment`
            FROM `INFORMATION_SCHEMA`.`COLUMNS`
            WHERE `TABLE_SCHEMA` = ? AND `TABLE_NAME` = ? AND {conditions}
            ORDER BY `ORDINAL_POSITION` ASC
        "#
        )
    }
}

#[async_trait]
impl CatalogStrategy for MysqlStrategy {
    fn name(&self) -> &str {
        "mysql"
    }

    async fn query_schemas(
        &self,
        conn: &mut dyn CatalogConnection,
        schemas: Option<&[String]>,
    ) -> Result<Vec<Schema>> {
        let mut params = Vec::new();
        let conditions = sql_in(&mut params, "`SCHEMA_NAME`", schemas);

        let query = format!(
            r#"
            SELECT
                CAST(`SCHEMA_NAME` AS CHAR) AS `name`,
                CAST(`DEFAULT_CHARACTER_SET_NAME` AS CHAR) AS `characterSet`,
                CAST(`DEFAULT_COLLATION_NAME` AS CHAR) AS `collation`
            FROM `INFORMATION_SCHEMA`.`SCHEMATA`
            WHERE
                `SCHEMA_NAME` NOT IN (
                    'information_schema',
                    'mysql',
                    'performance_schema',
                    'sys'
                ) AND {conditions}
            ORDER BY `SCHEMA_NAME` ASC
        "#
        );

        let rows = conn.fetch_all(&query, &params).await?;
        debug!("INFORMATION_SCHEMA.SCHEMATA returned {} rows", rows.len());

        rows.iter()
            .map(|row| {
                Ok(Schema::new(row.require_str("name", "INFORMATION_SCHEMA.SCHEMATA")?)
                    .with_character_set(row.opt_str("characterSet"))
                    .with_collation(row.opt_str("collation")))
            })
            .collect()
    }

    async fn query_tables(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        tables: Option<&[String]>,
    ) -> Result<Vec<Table>> {
        let mut params = vec![schema.name.clone()];
        let conditions = sql_in(&mut params, "`TABLES`.`TABLE_NAME`", tables);

        let query = format!(
            r#"
            SELECT
                CAST(`TABLES`.`TABLE_NAME` AS CHAR) AS `name`,
                CAST(`TABLES`.`ENGINE` AS CHAR) AS `engine`,
                CAST(`COLLATION_CHARACTER_SET_APPLICABILITY`.`CHARACTER_SET_NAME` AS CHAR) AS `characterSet`,
                CAST(`TABLES`.`TABLE_COLLATION` AS CHAR) AS `collation`,
                CAST(`TABLES`.`TABLE_COMMENT` AS CHAR) AS `comment`
            FROM `INFORMATION_SCHEMA`.`TABLES`
            LEFT JOIN `INFORMATION_SCHEMA`.`COLLATION_CHARACTER_SET_APPLICABILITY` ON
                `TABLES`.`TABLE_COLLATION` = `COLLATION_CHARACTER_SET_APPLICABILITY`.`COLLATION_NAME`
            WHERE `TABLES`.`TABLE_TYPE` = 'BASE TABLE' AND `TABLES`.`TABLE_SCHEMA` = ? AND {conditions}
            ORDER BY `TABLES`.`TABLE_NAME` ASC
        "#
        );

        let rows = conn.fetch_all(&query, &params).await?;
        debug!("Schema {}: {} base tables", schema.name, rows.len());

        rows.iter()
            .map(|row| {
                Ok(Table::new(row.require_str("name", "INFORMATION_SCHEMA.TABLES")?)
                    .with_engine(row.opt_str("engine"))
                    .with_character_set(row.opt_str("characterSet"))
                    .with_collation(row.opt_str("collation"))
                    .with_comment(row.opt_str("comment").filter(|c| !c.is_empty())))
            })
            .collect()
    }

    async fn query_columns(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        table: &Table,
        columns: Option<&[String]>,
    ) -> Result<Vec<Column>> {
        let temporal_precision = self.supports_temporal_precision(conn).await?;

        let mut params = vec![schema.name.clone(), table.name.clone()];
        let conditions = sql_in(&mut params, "`COLUMN_NAME`", columns);
        let query = Self::columns_query(&conditions, temporal_precision);

        let rows = conn.fetch_all(&query, &params).await?;
        debug!("Table {}.{}: {} columns", schema.name, table.name, rows.len());

        rows.iter().map(normalize_column).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::CatalogRow;
    use crate::drivers::testing::RecordingConnection;

    fn schema_row(name: &str) -> CatalogRow {
        CatalogRow::new()
            .with("name", name)
            .with("characterSet", "utf8mb4")
            .with("collation", "utf8mb4_0900_ai_ci")
    }

    fn table_row(name: &str) -> CatalogRow {
        CatalogRow::new()
            .with("name", name)
            .with("engine", "InnoDB")
            .with("characterSet", "utf8mb4")
            .with("collation", "utf8mb4_0900_ai_ci")
            .with("comment", "")
    }

    fn column_row(name: &str, data_type: &str, column_type: &str) -> CatalogRow {
        CatalogRow::new()
            .with("name", name)
            .with("defaultValue", Option::<&str>::None)
            .with("nullable", "NO")
            .with("dataType", data_type)
            .with("maximumLength", Option::<i64>::None)
            .with("characterSet", Option::<&str>::None)
            .with("collation", Option::<&str>::None)
            .with("type", column_type)
            .with("numericPrecision", Option::<i64>::None)
            .with("numericScale", Option::<i64>::None)
            .with("datetimePrecision", Option::<i64>::None)
            .with("extra", "")
            .with("comment", "")
    }

    fn shop_connection(version: &str) -> RecordingConnection {
        RecordingConnection::new("mysql", version)
            .respond("`SCHEMATA`", vec![schema_row("shop")])
            .respond("`INFORMATION_SCHEMA`.`TABLES`", vec![table_row("orders"), table_row("users")])
            .respond_with_params("`COLUMNS`", &["shop", "orders"], vec![
                column_row("id", "bigint", "bigint unsigned").with("extra", "auto_increment"),
                column_row("user_id", "int", "int"),
                column_row("status", "enum", "enum('new','paid')"),
            ])
            .respond_with_params("`COLUMNS`", &["shop", "users"], vec![
                column_row("id", "int", "int(11)"),
                column_row("email", "varchar", "varchar(255)").with("maximumLength", 255i64),
            ])
    }

    #[tokio::test]
    async fn test_fetch_schema_links_tables_and_columns() {
        let mut conn = shop_connection("8.0.32");
        let schema = MysqlStrategy::new()
            .fetch_schema(&mut conn, "shop")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(schema.name, "shop");
        assert_eq!(schema.character_set.as_deref(), Some("utf8mb4"));
        assert_eq!(schema.table_names(), vec!["orders", "users"]);

        let orders = schema.table("orders").unwrap();
        assert_eq!(orders.engine.as_deref(), Some("InnoDB"));
        assert!(orders.comment.is_none());
        assert_eq!(orders.column_names(), vec!["id", "user_id", "status"]);

        let id = orders.column("id").unwrap();
        assert!(id.auto_increment);
        assert!(id.unsigned);
        assert_eq!(id.maximum_value.as_deref(), Some("18446744073709551615"));
        assert_eq!(id.table().name, "orders");
        assert_eq!(id.schema().name, "shop");

        let status = orders.column("status").unwrap();
        assert_eq!(status.options.as_deref(), Some(&["new".to_string(), "paid".to_string()][..]));

        let email = schema.table("users").unwrap().column("email").unwrap();
        assert_eq!(email.maximum_length, Some(255));
    }

    #[tokio::test]
    async fn test_fetch_schema_binds_schema_name() {
        let mut conn = shop_connection("8.0.32");
        MysqlStrategy::new().fetch_schema(&mut conn, "shop").await.unwrap();

        let (query, params) = &conn.executed()[0];
        assert!(query.contains("`SCHEMA_NAME` IN (?)"));
        assert!(!query.contains("'shop'"));
        assert_eq!(params, &vec!["shop".to_string()]);

        let (query, params) = &conn.executed()[1];
        assert!(query.contains("`TABLE_SCHEMA` = ?"));
        assert!(query.contains("(1=1)"));
        assert_eq!(params, &vec!["shop".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_schema_not_found() {
        let mut conn = RecordingConnection::new("mysql", "8.0.32");
        let schema = MysqlStrategy::new().fetch_schema(&mut conn, "missing").await.unwrap();
        assert!(schema.is_none());
        // Nothing past the schema lookup is queried.
        assert_eq!(conn.executed().len(), 1);
    }

    #[tokio::test]
    async fn test_column_order_follows_catalog_order() {
        let mut conn = RecordingConnection::new("mysql", "8.0.32").respond("`COLUMNS`", vec![
            column_row("zeta", "int", "int"),
            column_row("alpha", "int", "int"),
            column_row("mid", "int", "int"),
        ]);
        let schema = Schema::new("shop");
        let table = Table::new("t");
        let columns = MysqlStrategy::new()
            .query_columns(&mut conn, &schema, &table, None)
            .await
            .unwrap();

        let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(conn.executed()[0].0.contains("ORDER BY `ORDINAL_POSITION` ASC"));
    }

    #[tokio::test]
    async fn test_empty_filter_matches_nothing() {
        let mut conn = RecordingConnection::new("mysql", "8.0.32");
        let schemas = MysqlStrategy::new()
            .query_schemas(&mut conn, Some(&[]))
            .await
            .unwrap();
        assert!(schemas.is_empty());

        let (query, params) = &conn.executed()[0];
        assert!(query.contains("(0=1)"));
        assert!(params.is_empty());
    }

    #[tokio::test]
    async fn test_temporal_precision_selected_on_new_enough_server() {
        let mut conn = RecordingConnection::new("mysql", "5.6.4-log");
        MysqlStrategy::new()
            .query_columns(&mut conn, &Schema::new("s"), &Table::new("t"), None)
            .await
            .unwrap();
        assert!(conn.executed()[0].0.contains("CAST(`DATETIME_PRECISION` AS SIGNED)"));
    }

    #[tokio::test]
    async fn test_temporal_precision_absent_on_old_server() {
        let mut conn = RecordingConnection::new("mysql", "5.5.62");
        MysqlStrategy::new()
            .query_columns(&mut conn, &Schema::new("s"), &Table::new("t"), None)
            .await
            .unwrap();
        let query = &conn.executed()[0].0;
        assert!(!query.contains("`DATETIME_PRECISION`"));
        assert!(query.contains("NULL AS `datetimePrecision`"));
    }

    #[tokio::test]
    async fn test_temporal_precision_follows_comparison_mode() {
        let mut conn = RecordingConnection::new("mysql", "8.0.32");
        let componentwise = MysqlStrategy::new();
        assert!(!componentwise.supports_temporal_precision(&mut conn).await.unwrap());

        let lexicographic =
            MysqlStrategy::new().with_version_comparison(VersionComparison::Lexicographic);
        assert!(lexicographic.supports_temporal_precision(&mut conn).await.unwrap());
    }

    #[tokio::test]
    async fn test_precision_warning_latches_once_per_strategy() {
        let mut conn = shop_connection("8.0.32");
        let strategy = MysqlStrategy::new();
        assert!(!strategy.precision_warned.load(Ordering::Relaxed));

        strategy.fetch_schema(&mut conn, "shop").await.unwrap().unwrap();
        assert!(strategy.precision_warned.load(Ordering::Relaxed));

        // A fresh strategy (one per fetch) warns again.
        assert!(!MysqlStrategy::new().precision_warned.load(Ordering::Relaxed));

        let mut modern = RecordingConnection::new("mysql", "5.7.44");
        let supported = MysqlStrategy::new();
        assert!(supported.supports_temporal_precision(&mut modern).await.unwrap());
        assert!(!supported.precision_warned.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn test_column_filter_is_bound() {
        let mut conn = RecordingConnection::new("mysql", "8.0.32");
        let filter = vec!["id".to_string(), "email".to_string()];
        MysqlStrategy::new()
            .query_columns(&mut conn, &Schema::new("shop"), &Table::new("users"), Some(&filter))
            .await
            .unwrap();

        let (query, params) = &conn.executed()[0];
        assert!(query.contains("`COLUMN_NAME` IN (?,?)"));
        assert_eq!(params, &vec!["shop", "users", "id", "email"]);
    }
}
