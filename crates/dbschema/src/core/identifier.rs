//! Identifier validation and quoting for catalog queries.
//!
//! Catalog filters are always bound as parameters. The one place an
//! identifier has to be spliced into SQL text is SQLite's schema-qualified
//! `sqlite_master` lookup, where the schema name is a qualifier and cannot be
//! a bound value. Such names go through [`quote_sqlite`].

use crate::error::{Result, SchemaError};

/// Validate an identifier before it is placed in query text.
///
/// Rejects empty identifiers and identifiers containing null bytes. Length is
/// not limited: SQLite accepts attached database names of any length.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SchemaError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(SchemaError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    Ok(())
}

/// Quote a SQLite identifier.
///
/// Escapes double quotes by doubling them and wraps in double quotes.
///
/// ```ignore
/// assert_eq!(quote_sqlite("main")?, "\"main\"");
/// assert_eq!(quote_sqlite("we\"ird")?, "\"we\"\"ird\"");
/// ```
pub fn quote_sqlite(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}
