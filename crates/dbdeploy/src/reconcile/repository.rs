//! Repository façade over the script source and the change history.

use std::sync::Arc;

use tracing::debug;

use super::{applied_entry, determine_pending, ensure_ascending, failed_entries, PendingScript};
use crate::core::{ChangeEntry, ChangeScript, ScriptIdentity};
use crate::error::Result;
use crate::history::ChangeHistory;
use crate::source::AvailableScripts;

/// Inputs and outcome of one reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub available: Vec<ChangeScript>,
    pub applied: Vec<ChangeEntry>,
    pub pending: Vec<PendingScript>,
}

/// Combines available scripts and journal history.
#[derive(Clone)]
pub struct ChangeRepository {
    scripts: Arc<dyn AvailableScripts>,
    history: Arc<dyn ChangeHistory>,
}

impl ChangeRepository {
    pub fn new(scripts: Arc<dyn AvailableScripts>, history: Arc<dyn ChangeHistory>) -> Self {
        Self { scripts, history }
    }

    /// All available scripts, verified strictly ascending.
    pub async fn all_scripts(&self) -> Result<Vec<ChangeScript>> {
        let scripts = self.scripts.available_scripts().await?;
        ensure_ascending(&scripts)?;
        Ok(scripts)
    }

    /// Every journal entry.
    pub async fn applied_changes(&self) -> Result<Vec<ChangeEntry>> {
        self.history.applied_changes().await
    }

    /// Journal entries that did not complete successfully.
    pub async fn failed_changes(&self) -> Result<Vec<ChangeEntry>> {
        Ok(failed_entries(&self.applied_changes().await?))
    }

    /// Journal entry recorded for `script`, if any.
    pub async fn applied_entry(&self, script: &ChangeScript) -> Result<Option<ChangeEntry>> {
        let history = self.applied_changes().await?;
        Ok(applied_entry(&history, script).cloned())
    }

    /// Scripts to run now, ascending, honoring the optional inclusive cap.
    pub async fn pending_scripts(&self, cap: Option<&ScriptIdentity>) -> Result<Vec<PendingScript>> {
        Ok(self.reconcile(cap).await?.pending)
    }

    /// Fetch both sources once and compute the pending list.
    pub async fn reconcile(&self, cap: Option<&ScriptIdentity>) -> Result<Reconciliation> {
        let applied = self.applied_changes().await?;
        let available = self.all_scripts().await?;
        let pending = determine_pending(&available, &applied, cap);

        debug!(
            "Reconciled {} scripts ({}) against {} journal entries ({}): {} pending",
            available.len(),
            self.scripts.source_type(),
            applied.len(),
            self.history.backend_type(),
            pending.len()
        );

        Ok(Reconciliation {
            available,
            applied,
            pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptStatus;
    use crate::error::DeployError;
    use crate::history::StaticHistory;
    use crate::source::StaticScripts;
    use uuid::Uuid;

    fn repo(numbers: &[u64], history: Vec<ChangeEntry>) -> ChangeRepository {
        let scripts = numbers
            .iter()
            .map(|n| ChangeScript::new("v1.0", *n, format!("{:03}_change.sql", n), ""))
            .collect();
        ChangeRepository::new(
            Arc::new(StaticScripts::new(scripts)),
            Arc::new(StaticHistory::new(history)),
        )
    }

    fn entry(number: u64, status: ScriptStatus) -> ChangeEntry {
        ChangeEntry::new(Uuid::new_v4(), ScriptIdentity::new("v1.0", number), status)
    }

    #[tokio::test]
    async fn test_pending_scripts() {
        let repo = repo(&[1, 2, 3], vec![entry(1, ScriptStatus::Success)]);
        let pending = repo.pending_scripts(None).await.unwrap();
        let numbers: Vec<u64> = pending.iter().map(|p| p.script.number()).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_pending_scripts_with_cap() {
        let repo = repo(&[1, 2, 3, 4], vec![]);
        let cap = ScriptIdentity::new("v1.0", 2);
        assert_eq!(repo.pending_scripts(Some(&cap)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unsorted_source_is_rejected() {
        let repo = repo(&[2, 1], vec![]);
        let err = repo.pending_scripts(None).await.unwrap_err();
        assert!(matches!(err, DeployError::UnsortedScripts { .. }));
    }

    #[tokio::test]
    async fn test_failed_changes_and_lookup() {
        let failed = entry(2, ScriptStatus::Failure);
        let repo = repo(&[1, 2], vec![entry(1, ScriptStatus::Success), failed.clone()]);

        let failures = repo.failed_changes().await.unwrap();
        assert_eq!(failures, vec![failed.clone()]);

        let script = ChangeScript::new("v1.0", 2, "002_change.sql", "");
        assert_eq!(repo.applied_entry(&script).await.unwrap(), Some(failed));

        let unknown = ChangeScript::new("v1.0", 9, "009_change.sql", "");
        assert_eq!(repo.applied_entry(&unknown).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reconcile_returns_inputs() {
        let repo = repo(&[1, 2], vec![entry(1, ScriptStatus::Success)]);
        let result = repo.reconcile(None).await.unwrap();
        assert_eq!(result.available.len(), 2);
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.pending.len(), 1);
    }
}
