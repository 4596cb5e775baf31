//! Error types for the deployment library.

use thiserror::Error;

/// Exit code for configuration errors (bad YAML, unknown dialect, etc.).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code for database connection or query errors.
pub const EXIT_DATABASE_ERROR: u8 = 2;
/// Exit code when a change script failed to apply.
pub const EXIT_SCRIPT_FAILED: u8 = 3;
/// Exit code for template rendering errors.
pub const EXIT_RENDER_ERROR: u8 = 4;
/// Exit code for script discovery and ordering errors.
pub const EXIT_DISCOVERY_ERROR: u8 = 5;
/// Exit code when the run was cancelled.
pub const EXIT_CANCELLED: u8 = 6;
/// Exit code for file system errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for deployment operations.
#[derive(Error, Debug)]
pub enum DeployError {
    /// Dialect name does not match any supported database.
    #[error("Unsupported dialect '{0}' (expected one of: mssql, mysql, ora, firebird, pgsql, sybase)")]
    UnsupportedDialect(String),

    /// A required template field was missing or a placeholder was left unresolved.
    #[error("Template substitution failed for {script}: missing value for '{field}'")]
    TemplateSubstitution { script: String, field: String },

    /// Delimiter type is neither `normal` nor `row`.
    #[error("Unsupported delimiter type '{0}' (expected 'normal' or 'row')")]
    UnsupportedDelimiterMode(String),

    /// Available scripts were not strictly ascending by identity.
    #[error("Change scripts are not in ascending order: {previous} is followed by {next}")]
    UnsortedScripts { previous: String, next: String },

    /// Script directory could not be scanned or contains conflicting scripts.
    #[error("Script discovery failed: {0}")]
    ScriptDiscovery(String),

    /// A change script failed while executing against the target.
    #[error("Change script {script} failed: {message}")]
    ScriptFailed { script: String, message: String },

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Target database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Deployment was cancelled between scripts (SIGINT, etc.)
    #[error("Deployment cancelled")]
    Cancelled,
}

impl DeployError {
    /// Create a TemplateSubstitution error.
    pub fn substitution(script: impl Into<String>, field: impl Into<String>) -> Self {
        DeployError::TemplateSubstitution {
            script: script.into(),
            field: field.into(),
        }
    }

    /// Create a ScriptFailed error.
    pub fn script_failed(script: impl Into<String>, message: impl Into<String>) -> Self {
        DeployError::ScriptFailed {
            script: script.into(),
            message: message.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DeployError::UnsupportedDialect(_)
            | DeployError::UnsupportedDelimiterMode(_)
            | DeployError::Config(_)
            | DeployError::Yaml(_)
            | DeployError::Json(_) => EXIT_CONFIG_ERROR,
            DeployError::Database(_) => EXIT_DATABASE_ERROR,
            DeployError::ScriptFailed { .. } => EXIT_SCRIPT_FAILED,
            DeployError::TemplateSubstitution { .. } => EXIT_RENDER_ERROR,
            DeployError::UnsortedScripts { .. } | DeployError::ScriptDiscovery(_) => {
                EXIT_DISCOVERY_ERROR
            }
            DeployError::Cancelled => EXIT_CANCELLED,
            DeployError::Io(_) => EXIT_IO_ERROR,
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

/// Result type alias for deployment operations.
pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            DeployError::UnsupportedDialect("db2".into()).exit_code(),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(
            DeployError::substitution("v1/1", "script_name").exit_code(),
            EXIT_RENDER_ERROR
        );
        assert_eq!(DeployError::Cancelled.exit_code(), EXIT_CANCELLED);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(DeployError::from(io).exit_code(), EXIT_IO_ERROR);
    }

    #[test]
    fn test_format_detailed_includes_message() {
        let err = DeployError::script_failed("v1.0/002_change.sql", "syntax error");
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Change script v1.0/002_change.sql failed"));
    }
}
