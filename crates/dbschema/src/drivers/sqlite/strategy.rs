//! SQLite catalog strategy (`PRAGMA` introspection).
//!
//! SQLite has no `INFORMATION_SCHEMA`. Attached databases play the role of
//! schemas (`main`, `temp`, plus anything `ATTACH`ed), tables come from each
//! database's `sqlite_master`, and columns from `pragma_table_info`.
//!
//! Declared types are free-form in SQLite, so bounds are only known for the
//! handful of exact type names in [`value_bounds`].

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::core::identifier::quote_sqlite;
use crate::core::schema::{Column, Schema, Table};
use crate::core::traits::{CatalogConnection, CatalogStrategy};
use crate::drivers::common::{name_matches, sql_in};
use crate::error::{Result, SchemaError};

/// Default `SQLITE_MAX_LENGTH`: the largest string or blob, in bytes.
pub const SQLITE_MAX_LENGTH: u64 = 1_000_000_000;

/// `PRIMARY KEY [ASC|DESC] [ON CONFLICT ...] AUTOINCREMENT` within one column definition.
static PRIMARY_KEY_AUTOINCREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPRIMARY\s+KEY\b[^,)]*\bAUTOINCREMENT\b")
        .expect("primary key pattern is valid")
});

/// Strategy for SQLite databases.
#[derive(Debug, Clone, Default)]
pub struct SqliteStrategy;

impl SqliteStrategy {
    pub fn new() -> Self {
        Self
    }

    async fn encoding(conn: &mut dyn CatalogConnection) -> Result<Option<String>> {
        let rows = conn.fetch_all("PRAGMA encoding", &[]).await?;
        Ok(rows.first().and_then(|row| row.opt_str("encoding")))
    }

    /// Whether the table's DDL declares an `AUTOINCREMENT` primary key.
    async fn table_autoincrement(
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        table: &Table,
    ) -> Result<bool> {
        let query = format!(
            "SELECT sql FROM {}.sqlite_master WHERE type = 'table' AND name = ?",
            quote_sqlite(&schema.name)?
        );
        let rows = conn.fetch_all(&query, &[table.name.clone()]).await?;

        Ok(rows
            .first()
            .and_then(|row| row.opt_str("sql"))
            .is_some_and(|sql| declares_autoincrement(&sql)))
    }
}

/// Whether `CREATE TABLE` text declares `AUTOINCREMENT` on a primary key.
///
/// Quoted literals, quoted identifiers and comments are blanked first, so the
/// word only counts where it is a keyword.
pub fn declares_autoincrement(ddl: &str) -> bool {
    PRIMARY_KEY_AUTOINCREMENT.is_match(&strip_quoted(ddl))
}

/// Replace `'...'`, `"..."`, `` `...` ``, `[...]`, `-- ...` and `/* ... */`
/// spans with a single space.
fn strip_quoted(ddl: &str) -> String {
    let mut out = String::with_capacity(ddl.len());
    let mut chars = ddl.chars().peekable();

    while let Some(c) = chars.next() {
        let close = match c {
            '\'' | '"' | '`' => Some(c),
            '[' => Some(']'),
            '-' if chars.peek() == Some(&'-') => Some('\n'),
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                out.push(' ');
                continue;
            }
            _ => None,
        };

        match close {
            // A doubled quote ends one span and opens the next; both are blanked.
            Some(close) => {
                for next in chars.by_ref() {
                    if next == close {
                        break;
                    }
                }
                out.push(' ');
            }
            None => out.push(c),
        }
    }

    out
}

/// Static bounds for a lowercase declared type:
/// `(maximum_length, minimum_value, maximum_value)`.
///
/// | type      | maximum length | minimum / maximum value |
/// |-----------|----------------|-------------------------|
/// | `integer` | -              | i64 range               |
/// | `text`    | 1000000000     | -                       |
/// | `blob`    | 1000000000     | -                       |
pub fn value_bounds(data_type: &str) -> (Option<u64>, Option<String>, Option<String>) {
    match data_type {
        "integer" => (
            None,
            Some(i64::MIN.to_string()),
            Some(i64::MAX.to_string()),
        ),
        "text" | "blob" => (Some(SQLITE_MAX_LENGTH), None, None),
        _ => (None, None, None),
    }
}

#[async_trait]
impl CatalogStrategy for SqliteStrategy {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn query_schemas(
        &self,
        conn: &mut dyn CatalogConnection,
        schemas: Option<&[String]>,
    ) -> Result<Vec<Schema>> {
        let databases = conn.fetch_all("PRAGMA database_list", &[]).await?;
        let encoding = Self::encoding(conn).await?;
        debug!("PRAGMA database_list returned {} rows", databases.len());

        let mut results = Vec::new();
        for row in &databases {
            let name = row.require_str("name", "PRAGMA database_list")?;
            if !name_matches(schemas, &name) {
                continue;
            }
            results.push(
                Schema::new(name)
                    .with_character_set(encoding.clone())
                    .with_file(row.opt_str("file").filter(|f| !f.is_empty())),
            );
        }

        results.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(results)
    }

    async fn query_tables(
        &self,
        conn: &mut dyn CatalogConnection,
        schema: &Schema,
        tables: Option<&[String]>,
    ) -> Result<Vec<Table>> {
        let mut params = Vec::new();
        let conditions = sql_in(&mut params, "name", tables);

        let query = format!(
            r#"
            SELECT name
            FROM {}.sqlite_master
            WHERE
                type = 'table' AND
                name NOT LIKE 'sqlite\_%' ESCAPE '\' AND
                {conditions}
            ORDER BY name ASC
        "#,
            quote_sqlite(&schema.name)?
        );

        let rows = conn.fetch_all(&query, &params).await?;
        debug!("Schema {}: {} tables", schema.name, rows.len());

        rows.iter()
            .map(|row| {
                Ok(Table::new(row.require_str("name", "sqlite_master")?)
                    .with_character_set(schema.character_set.clone()))
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
        let mut params = vec![table.name.clone(), schema.name.clone()];
        let conditions = sql_in(&mut params, "name", columns);

        let query = format!(
            r#"
            SELECT cid, name, type, "notnull" AS nn, dflt_value, pk
            FROM pragma_table_info(?, ?)
            WHERE {conditions}
            ORDER BY cid ASC
        "#
        );

        let rows = conn.fetch_all(&query, &params).await?;
        debug!("Table {}.{}: {} columns", schema.name, table.name, rows.len());

        let autoincrement = if rows.is_empty() {
            false
        } else {
            Self::table_autoincrement(conn, schema, table).await?
        };

        rows.iter()
            .map(|row| {
                let context = "pragma_table_info";
                let name = row.require_str("name", context)?;
                let data_type = row.str_or_empty("type").trim().to_lowercase();
                let not_null = row
                    .opt_i64("nn")
                    .ok_or_else(|| SchemaError::missing_field("notnull", context))?;
                let primary_key = row.opt_i64("pk").unwrap_or(0) > 0;
                let (maximum_length, minimum_value, maximum_value) = value_bounds(&data_type);

                Ok(Column {
                    name,
                    nullable: not_null == 0,
                    default_value: row.opt_str("dflt_value"),
                    auto_increment: autoincrement && primary_key && data_type == "integer",
                    maximum_length,
                    minimum_value,
                    maximum_value,
                    character_set: schema.character_set.clone(),
                    data_type,
                    ..Column::default()
                })
            })
            .collect()
    }
}
