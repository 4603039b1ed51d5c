//! Error types for the introspection library.

use thiserror::Error;

/// Main error type for introspection operations.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Configuration error (invalid YAML, missing fields, bad URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reported by the sqlx driver (connection loss, permission denied, bad query)
    #[error("Database error while {context}")]
    Database {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// No catalog strategy exists for the connection's driver
    #[error("Unsupported database driver: '{0}'. Supported drivers: mysql, mariadb, sqlite")]
    UnknownDialect(String),

    /// An attribute set named a field the entity does not have
    #[error("Invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Two tables in a schema (or two columns in a table) share a name
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: &'static str, name: String },

    /// A catalog row lacked a column the normalizer requires
    #[error("Catalog row is missing '{field}' ({context})")]
    MissingField { field: String, context: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchemaError {
    /// Create a Database error with context about where it occurred
    pub fn database(source: sqlx::Error, context: impl Into<String>) -> Self {
        SchemaError::Database {
            context: context.into(),
            source,
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        SchemaError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            SchemaError::Config(_) | SchemaError::Yaml(_) => 1,
            SchemaError::Database { .. } => 2,
            SchemaError::UnknownDialect(_) => 4,
            SchemaError::InvalidAttribute(_)
            | SchemaError::DuplicateName { .. }
            | SchemaError::MissingField { .. }
            | SchemaError::Json(_) => 5,
            SchemaError::Io(_) => 7,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for introspection operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
