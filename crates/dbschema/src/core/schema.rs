//! Schema, table and column metadata types.
//!
//! The graph is owned top-down: a [`Schema`] owns its [`Table`]s, which own
//! their [`Column`]s. Parent links are expressed with the borrowed handles
//! [`TableRef`] and [`ColumnRef`], so a column can reach its table and schema
//! without reference cycles. Once a schema has been assembled nothing in the
//! crate mutates it; share it as `Arc<Schema>`.
//!
//! Fields are read through accessors. Columns are only built by the catalog
//! normalizers (or a JSON snapshot), so a column's bounds always come from its
//! type.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// A database schema (MySQL database, SQLite attached database).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Schema name.
    pub(crate) name: String,

    /// Default character set (SQLite: the database encoding).
    #[serde(default)]
    pub(crate) character_set: Option<String>,

    /// Default collation.
    #[serde(default)]
    pub(crate) collation: Option<String>,

    /// Backing file, for engines that expose one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) file: Option<String>,

    /// Tables in catalog order.
    #[serde(default)]
    tables: Vec<Table>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            character_set: None,
            collation: None,
            file: None,
            tables: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default character set (SQLite: the database encoding).
    pub fn character_set(&self) -> Option<&str> {
        self.character_set.as_deref()
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    /// Backing file, for engines that expose one.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn with_character_set(mut self, character_set: Option<String>) -> Self {
        self.character_set = character_set;
        self
    }

    pub fn with_collation(mut self, collation: Option<String>) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    /// Attach a fully built table.
    pub(crate) fn push_table(&mut self, table: Table) -> Result<()> {
        if self.tables.iter().any(|t| t.name == table.name) {
            return Err(SchemaError::DuplicateName {
                kind: "table",
                name: table.name,
            });
        }
        self.tables.push(table);
        Ok(())
    }

    /// Tables in catalog order, each carrying a link back to this schema.
    pub fn tables(&self) -> impl Iterator<Item = TableRef<'_>> + '_ {
        self.tables.iter().map(move |table| TableRef {
            schema: self,
            table,
        })
    }

    /// Look up a table by exact (case-sensitive) name.
    pub fn table(&self, name: &str) -> Option<TableRef<'_>> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .map(|table| TableRef {
                schema: self,
                table,
            })
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Rebuild a schema from a JSON snapshot.
    ///
    /// Unknown attribute names are rejected with [`SchemaError::InvalidAttribute`]
    /// and duplicate table or column names with [`SchemaError::DuplicateName`].
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: Schema = serde_json::from_str(json).map_err(|e| {
            if e.is_data() && e.to_string().starts_with("unknown field") {
                SchemaError::InvalidAttribute(e.to_string())
            } else {
                SchemaError::Json(e)
            }
        })?;
        schema.check_unique_names()?;
        Ok(schema)
    }

    /// Serialize the schema as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_unique_names(&self) -> Result<()> {
        for (i, table) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|t| t.name == table.name) {
                return Err(SchemaError::DuplicateName {
                    kind: "table",
                    name: table.name.clone(),
                });
            }
            for (j, column) in table.columns.iter().enumerate() {
                if table.columns[..j].iter().any(|c| c.name == column.name) {
                    return Err(SchemaError::DuplicateName {
                        kind: "column",
                        name: format!("{}.{}", table.name, column.name),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Table metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Table {
    /// Table name.
    pub(crate) name: String,

    /// Storage engine (MySQL only).
    #[serde(default)]
    pub(crate) engine: Option<String>,

    #[serde(default)]
    pub(crate) character_set: Option<String>,

    #[serde(default)]
    pub(crate) collation: Option<String>,

    #[serde(default)]
    pub(crate) comment: Option<String>,

    /// Columns in ordinal order.
    #[serde(default)]
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            engine: None,
            character_set: None,
            collation: None,
            comment: None,
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage engine (MySQL only).
    pub fn engine(&self) -> Option<&str> {
        self.engine.as_deref()
    }

    pub fn character_set(&self) -> Option<&str> {
        self.character_set.as_deref()
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn with_engine(mut self, engine: Option<String>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_character_set(mut self, character_set: Option<String>) -> Self {
        self.character_set = character_set;
        self
    }

    pub fn with_collation(mut self, collation: Option<String>) -> Self {
        self.collation = collation;
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    /// Append a column; position in the table is the order of the calls.
    pub(crate) fn push_column(&mut self, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(SchemaError::DuplicateName {
                kind: "column",
                name: format!("{}.{}", self.name, column.name),
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Columns in ordinal order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by exact (case-sensitive) name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Column metadata, normalized across dialects.
///
/// `minimum_value` and `maximum_value` are decimal strings so that bounds
/// beyond `i64` (e.g. unsigned bigint) and exact decimals survive intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Column {
    /// Column name.
    pub(crate) name: String,

    /// Lowercase data type (e.g. "int", "varchar", "integer").
    pub(crate) data_type: String,

    pub(crate) unsigned: bool,

    pub(crate) zerofill: bool,

    pub(crate) nullable: bool,

    /// Raw default expression as reported by the catalog.
    pub(crate) default_value: Option<String>,

    /// Permitted values for enum/set columns, in declaration order.
    pub(crate) options: Option<Vec<String>>,

    pub(crate) auto_increment: bool,

    /// Maximum length in characters (or bytes for binary types).
    pub(crate) maximum_length: Option<u64>,

    pub(crate) minimum_value: Option<String>,

    pub(crate) maximum_value: Option<String>,

    /// Numeric precision, or fractional seconds precision for temporal types.
    pub(crate) precision: Option<u32>,

    pub(crate) scale: Option<u32>,

    /// Integer display width, e.g. 11 for `int(11)`.
    pub(crate) display_width: Option<u32>,

    pub(crate) character_set: Option<String>,

    pub(crate) collation: Option<String>,

    pub(crate) comment: Option<String>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase data type.
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn unsigned(&self) -> bool {
        self.unsigned
    }

    pub fn zerofill(&self) -> bool {
        self.zerofill
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    /// Raw default expression as reported by the catalog.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Permitted values for enum/set columns.
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    pub fn auto_increment(&self) -> bool {
        self.auto_increment
    }

    pub fn maximum_length(&self) -> Option<u64> {
        self.maximum_length
    }

    /// Smallest representable value, as a decimal or temporal string.
    pub fn minimum_value(&self) -> Option<&str> {
        self.minimum_value.as_deref()
    }

    /// Largest representable value, as a decimal or temporal string.
    pub fn maximum_value(&self) -> Option<&str> {
        self.maximum_value.as_deref()
    }

    pub fn precision(&self) -> Option<u32> {
        self.precision
    }

    pub fn scale(&self) -> Option<u32> {
        self.scale
    }

    pub fn display_width(&self) -> Option<u32> {
        self.display_width
    }

    pub fn character_set(&self) -> Option<&str> {
        self.character_set.as_deref()
    }

    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Whether the column has a finite list of permitted values.
    pub fn is_enumerated(&self) -> bool {
        self.options.is_some()
    }

    /// Whether the catalog (or a derived rule) gave the column a value range.
    pub fn has_value_bounds(&self) -> bool {
        self.minimum_value.is_some() || self.maximum_value.is_some()
    }
}

/// A table together with the schema that owns it.
#[derive(Debug, Clone, Copy)]
pub struct TableRef<'a> {
    schema: &'a Schema,
    table: &'a Table,
}

impl<'a> TableRef<'a> {
    /// Owning schema.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// The table data itself.
    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// `schema.table`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.schema.name, self.table.name)
    }

    /// Columns in ordinal order, each carrying a link back to this table.
    pub fn columns(&self) -> impl Iterator<Item = ColumnRef<'a>> + 'a {
        let parent = *self;
        self.table.columns.iter().map(move |column| ColumnRef {
            table: parent,
            column,
        })
    }

    /// Look up a column by exact (case-sensitive) name.
    pub fn column(&self, name: &str) -> Option<ColumnRef<'a>> {
        let parent = *self;
        self.table.column(name).map(|column| ColumnRef {
            table: parent,
            column,
        })
    }
}

impl Deref for TableRef<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        self.table
    }
}

/// A column together with the table (and schema) that owns it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef<'a> {
    table: TableRef<'a>,
    column: &'a Column,
}

impl<'a> ColumnRef<'a> {
    /// Owning table.
    pub fn table(&self) -> TableRef<'a> {
        self.table
    }

    /// Owning schema.
    pub fn schema(&self) -> &'a Schema {
        self.table.schema
    }

    /// The column data itself.
    pub fn column(&self) -> &'a Column {
        self.column
    }

    /// `schema.table.column`
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.table.full_name(), self.column.name)
    }
}

impl Deref for ColumnRef<'_> {
    type Target = Column;

    fn deref(&self) -> &Column {
        self.column
    }
}
