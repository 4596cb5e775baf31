//! PostgreSQL-backed change journal.
//!
//! Reads the journal table written by the rendered bookkeeping statements.
//! Column names are unquoted in the DDL, so PostgreSQL folds them to lower
//! case; the table name itself is quoted and keeps its case.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::ChangeHistory;
use crate::config::ConnectionConfig;
use crate::core::{ChangeEntry, ScriptIdentity, ScriptStatus};
use crate::error::{DeployError, Result};

/// Open a connection and drive it on a background task.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<Client>> {
    let (client, connection) = config.pg_config().connect(NoTls).await?;

    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {}", e);
        }
    });

    info!(
        "Connected to PostgreSQL {}:{}/{}",
        config.host, config.port, config.database
    );
    Ok(Arc::new(client))
}

/// Journal table in a PostgreSQL database.
pub struct PgJournal {
    client: Arc<Client>,
    /// Quoted table name.
    table: String,
}

impl PgJournal {
    /// `table` must already be quoted (see [`crate::dialect::DialectRules::quote_table`]).
    pub fn new(client: Arc<Client>, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Whether the journal table exists yet.
    pub async fn exists(&self) -> Result<bool> {
        let row = self
            .client
            .query_one("SELECT to_regclass($1::text) IS NOT NULL", &[&self.table])
            .await?;
        Ok(row.try_get::<_, bool>(0)?)
    }
}

#[async_trait]
impl ChangeHistory for PgJournal {
    async fn applied_changes(&self) -> Result<Vec<ChangeEntry>> {
        if !self.exists().await? {
            warn!("Journal table {} does not exist yet", self.table);
            return Ok(Vec::new());
        }

        let rows = self
            .client
            .query(
                &format!(
                    "SELECT ChangeId::text, Folder, ScriptNumber, ScriptName, StartDate, \
                     CompleteDate, AppliedBy, ScriptStatus::int4, ScriptOutput
                     FROM {}",
                    self.table
                ),
                &[],
            )
            .await?;

        let entries = rows.iter().map(entry_from_row).collect::<Result<Vec<_>>>()?;
        debug!("Read {} journal entries from {}", entries.len(), self.table);
        Ok(entries)
    }

    fn backend_type(&self) -> &'static str {
        "postgres"
    }
}

fn entry_from_row(row: &Row) -> Result<ChangeEntry> {
    let record_id: String = row.try_get(0)?;
    let record_id = Uuid::parse_str(&record_id)
        .map_err(|e| DeployError::Config(format!("Invalid journal ChangeId '{}': {}", record_id, e)))?;

    let number: i64 = row.try_get(2)?;
    let number = u64::try_from(number).map_err(|_| {
        DeployError::Config(format!("Invalid journal ScriptNumber: {}", number))
    })?;

    Ok(ChangeEntry {
        record_id,
        identity: ScriptIdentity::new(row.try_get::<_, String>(1)?, number),
        name: row.try_get(3)?,
        status: ScriptStatus::from_code(row.try_get(7)?)?,
        started_at: row.try_get::<_, Option<DateTime<Utc>>>(4)?,
        completed_at: row.try_get::<_, Option<DateTime<Utc>>>(5)?,
        applied_by: row.try_get(6)?,
        output: row.try_get(8)?,
    })
}
