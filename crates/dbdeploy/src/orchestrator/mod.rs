//! Deployment orchestrator - reconciles, renders and submits change scripts.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::core::ScriptIdentity;
use crate::error::{DeployError, Result};
use crate::reconcile::{summarize_identities, ChangeRepository, Reconciliation};
use crate::render::{Statement, TemplateRenderer};
use crate::sink::StatementSink;

/// Deployment orchestrator.
pub struct Deployer {
    repository: ChangeRepository,
    renderer: TemplateRenderer,
    create_journal_table: bool,
}

/// Result of a deployment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployReport {
    /// Unique run identifier.
    pub run_id: String,

    /// Final status.
    pub status: String,

    /// Target dialect name.
    pub dialect: String,

    /// Sink the statements were submitted to.
    pub sink: String,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// Scripts found in the source.
    pub scripts_available: usize,

    /// Journal entries found before the run.
    pub journal_entries: usize,

    /// Scripts submitted in this run, in order.
    pub scripts_applied: Vec<String>,

    /// Scripts among `scripts_applied` that were retried after an earlier failure.
    pub scripts_rerun: Vec<String>,

    /// Whether the journal DDL was emitted.
    pub journal_table_created: bool,
}

impl DeployReport {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Deployer {
    /// Create a new deployer.
    pub fn new(repository: ChangeRepository, renderer: TemplateRenderer) -> Self {
        Self {
            repository,
            renderer,
            create_journal_table: false,
        }
    }

    /// Emit the journal CREATE TABLE before any script.
    pub fn with_journal_creation(mut self, create: bool) -> Self {
        self.create_journal_table = create;
        self
    }

    pub fn repository(&self) -> &ChangeRepository {
        &self.repository
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Reconcile scripts against the journal and log range summaries.
    pub async fn pending(&self, cap: Option<&ScriptIdentity>) -> Result<Reconciliation> {
        let reconciliation = self.repository.reconcile(cap).await?;

        let mut applied: Vec<&ScriptIdentity> = reconciliation
            .applied
            .iter()
            .filter(|e| e.executed_successfully())
            .map(|e| &e.identity)
            .collect();
        applied.sort();
        applied.dedup();
        info!("Changes currently applied to database: {}", summarize_identities(applied));
        info!(
            "Scripts available: {}",
            summarize_identities(reconciliation.available.iter().map(|s| s.identity()))
        );
        info!(
            "To be applied: {}",
            summarize_identities(reconciliation.pending.iter().map(|p| p.script.identity()))
        );
        if let Some(cap) = cap {
            info!("Applying changes up to and including {}", cap);
        }

        Ok(reconciliation)
    }

    /// Submit every pending script to `sink`, stopping at the first failure.
    pub async fn run(
        &self,
        sink: &mut dyn StatementSink,
        cap: Option<&ScriptIdentity>,
        cancel: &CancellationToken,
    ) -> Result<DeployReport> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();

        info!(
            "Starting deployment run {} ({} -> {})",
            run_id,
            self.renderer.rules().name(),
            sink.sink_type()
        );

        let reconciliation = self.pending(cap).await?;

        if cancel.is_cancelled() {
            return Err(DeployError::Cancelled);
        }

        if self.create_journal_table {
            let ddl = self.renderer.render_journal_ddl()?;
            sink.submit(&Statement::Sql(ddl)).await?;
            debug!("Submitted journal DDL for {}", self.renderer.journal_table());
        }

        let mut scripts_applied = Vec::with_capacity(reconciliation.pending.len());
        let mut scripts_rerun = Vec::new();

        for pending in &reconciliation.pending {
            if cancel.is_cancelled() {
                warn!(
                    "Deployment cancelled after {} of {} scripts",
                    scripts_applied.len(),
                    reconciliation.pending.len()
                );
                return Err(DeployError::Cancelled);
            }

            let change = self.renderer.render(pending)?;
            debug!(
                "Submitting {} (record {}, rerun: {})",
                change.display_name, change.record_id, change.rerun
            );

            for statement in change.statements() {
                if let Err(e) = sink.submit(&statement).await {
                    if !matches!(statement, Statement::Script(_)) {
                        return Err(e);
                    }

                    let message = e.to_string();
                    error!("Change script {} failed: {}", change.display_name, message);
                    let failure = self.renderer.render_failure(&change, &message)?;
                    if let Err(journal_err) = sink.submit(&Statement::Sql(failure)).await {
                        warn!(
                            "Could not record failure of {} in journal: {}",
                            change.display_name, journal_err
                        );
                    }
                    return Err(DeployError::script_failed(change.display_name, message));
                }
            }

            if change.rerun {
                scripts_rerun.push(change.display_name.clone());
            }
            scripts_applied.push(change.display_name);
        }

        let completed_at = Utc::now();
        let duration = timer.elapsed().as_secs_f64();

        info!(
            "Deployment complete: {} scripts in {:.2}s",
            scripts_applied.len(),
            duration
        );

        Ok(DeployReport {
            run_id,
            status: "completed".to_string(),
            dialect: self.renderer.rules().name().to_string(),
            sink: sink.sink_type().to_string(),
            started_at,
            completed_at,
            duration_seconds: duration,
            scripts_available: reconciliation.available.len(),
            journal_entries: reconciliation.applied.len(),
            scripts_applied,
            scripts_rerun,
            journal_table_created: self.create_journal_table,
        })
    }
}
