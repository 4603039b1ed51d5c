//! Configuration validation.

use super::Config;
use crate::drivers::StrategyImpl;
use crate::error::{Result, SchemaError};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let conn = &config.connection;

    // Unknown driver names surface as UnknownDialect, not a config error.
    StrategyImpl::for_driver(&conn.r#type)?;

    if conn.is_sqlite() {
        if conn.path.as_deref().map_or(true, str::is_empty) {
            return Err(SchemaError::Config(
                "connection.path is required for sqlite".into(),
            ));
        }
        return Ok(());
    }

    if conn.host.is_empty() {
        return Err(SchemaError::Config("connection.host is required".into()));
    }
    if conn.database.is_empty() {
        return Err(SchemaError::Config("connection.database is required".into()));
    }
    if conn.user.is_empty() {
        return Err(SchemaError::Config("connection.user is required".into()));
    }
    if conn.port == 0 {
        return Err(SchemaError::Config(
            "connection.port must be non-zero".into(),
        ));
    }

    Ok(())
}
