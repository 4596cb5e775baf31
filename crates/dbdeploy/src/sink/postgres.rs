//! Live execution against PostgreSQL.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_postgres::Client;
use tracing::{debug, info};

use super::StatementSink;
use crate::error::Result;
use crate::render::{DelimiterMode, Statement};

/// Executes statements on a PostgreSQL connection as they are submitted.
///
/// Script bodies are split into batches on row-delimiter lines; each batch
/// is sent with the simple query protocol, so it may hold several statements.
pub struct PgExecutor {
    client: Arc<Client>,
    delimiter: DelimiterMode,
}

impl PgExecutor {
    pub fn new(client: Arc<Client>, delimiter: DelimiterMode) -> Self {
        Self { client, delimiter }
    }
}

#[async_trait]
impl StatementSink for PgExecutor {
    async fn submit(&mut self, statement: &Statement) -> Result<()> {
        match statement {
            Statement::Marker(text) => info!("{}", text),
            Statement::Sql(sql) => {
                debug!("Executing: {}", sql);
                self.client.batch_execute(sql).await?;
            }
            Statement::Script(body) => {
                for batch in self.delimiter.split_batches(body) {
                    self.client.batch_execute(&batch).await?;
                }
            }
        }
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "postgres"
    }
}
