//! Configuration validation.

use super::Config;
use crate::dialect::Dialect;
use crate::error::{DeployError, Result};
use crate::render::DelimiterType;

/// Maximum identifier length (conservative limit across databases).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let dialect: Dialect = config.dialect.parse()?;

    if config.journal_table.trim().is_empty() {
        return Err(DeployError::Config("journal_table is required".into()));
    }
    for part in config.journal_table.split('.') {
        validate_identifier(part)?;
    }

    if config.scripts_dir.as_os_str().is_empty() {
        return Err(DeployError::Config("scripts_dir is required".into()));
    }

    if let Some(ref delimiter) = config.delimiter {
        if delimiter.trim().is_empty() {
            return Err(DeployError::Config("delimiter cannot be empty".into()));
        }
    }
    if let Some(ref kind) = config.delimiter_type {
        kind.parse::<DelimiterType>()?;
    }

    config.last_change()?;

    if let Some(ref conn) = config.connection {
        if dialect != Dialect::Postgres {
            return Err(DeployError::Config(format!(
                "connection is only supported for dialect 'pgsql', got '{}'",
                config.dialect
            )));
        }
        if conn.host.is_empty() {
            return Err(DeployError::Config("connection.host is required".into()));
        }
        if conn.database.is_empty() {
            return Err(DeployError::Config("connection.database is required".into()));
        }
        if conn.user.is_empty() {
            return Err(DeployError::Config("connection.user is required".into()));
        }
    }

    Ok(())
}

/// Validate an identifier for security issues.
///
/// Rejects empty identifiers, null bytes, and names over the length limit.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DeployError::Config("Identifier cannot be empty".to_string()));
    }

    if name.contains('\0') {
        return Err(DeployError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(DeployError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}
