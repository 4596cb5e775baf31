//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Target database syntax (mssql, mysql, ora, firebird, pgsql, sybase).
    pub dialect: String,

    /// Journal table name, optionally schema-qualified (default: ChangeLog).
    #[serde(default = "default_journal_table")]
    pub journal_table: String,

    /// Root directory of change scripts.
    pub scripts_dir: PathBuf,

    /// Statement delimiter. Dialect default if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,

    /// Delimiter placement: normal or row. Dialect default if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter_type: Option<String>,

    /// Last change to apply (inclusive), as `folder/number` or `number`.
    /// Everything pending is applied when not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_change_to_apply: Option<String>,

    /// Emit the journal CREATE TABLE before any script (default: false).
    #[serde(default)]
    pub create_journal_table: bool,

    /// PostgreSQL connection for reading the journal and live execution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionConfig>,
}

/// Target database connection (PostgreSQL).
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host.
    pub host: String,

    /// Database port (default: 5432).
    #[serde(default = "default_pg_port")]
    pub port: u16,

    /// Database name.
    pub database: String,

    /// Username.
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

fn default_journal_table() -> String {
    "ChangeLog".to_string()
}

fn default_pg_port() -> u16 {
    5432
}
