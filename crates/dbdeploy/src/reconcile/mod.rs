//! Reconciliation of available scripts against the change journal.
//!
//! [`determine_pending`] is a pure, single pass over the available scripts.
//! Each script is exactly one of:
//!
//! - absent from history: applied as a new change
//! - recorded without success: rerun, reusing the journal row's id
//! - recorded as succeeded: skipped
//!
//! With a cap, the pass stops at the first candidate beyond it. That early
//! stop is only correct for strictly ascending input, which
//! [`ensure_ascending`] checks before [`ChangeRepository`] reconciles.

mod repository;
mod summary;

pub use repository::{ChangeRepository, Reconciliation};
pub use summary::summarize_identities;

use std::collections::HashMap;

use uuid::Uuid;

use crate::core::{ChangeEntry, ChangeScript, ScriptIdentity, ScriptStatus};
use crate::error::{DeployError, Result};

/// A script selected for this run, paired with the journal row it must reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScript {
    pub script: ChangeScript,
    /// Record id of a previous unsuccessful attempt, if any.
    pub reuse_record_id: Option<Uuid>,
}

impl PendingScript {
    /// A script never attempted before.
    pub fn new(script: ChangeScript) -> Self {
        Self {
            script,
            reuse_record_id: None,
        }
    }

    /// A script whose earlier attempt is recorded under `record_id`.
    pub fn rerun(script: ChangeScript, record_id: Uuid) -> Self {
        Self {
            script,
            reuse_record_id: Some(record_id),
        }
    }

    pub fn is_rerun(&self) -> bool {
        self.reuse_record_id.is_some()
    }

    /// Journal record this run writes to.
    pub fn record_id(&self) -> Uuid {
        self.reuse_record_id
            .unwrap_or_else(|| self.script.new_record_id())
    }
}

/// Check that scripts are strictly ascending by identity.
///
/// Strictness also rules out two scripts sharing one identity.
pub fn ensure_ascending(scripts: &[ChangeScript]) -> Result<()> {
    for pair in scripts.windows(2) {
        if pair[0].identity() >= pair[1].identity() {
            return Err(DeployError::UnsortedScripts {
                previous: pair[0].display_name(),
                next: pair[1].display_name(),
            });
        }
    }
    Ok(())
}

/// Select the scripts that must run, in the order given.
///
/// `scripts` must be strictly ascending (see [`ensure_ascending`]). When
/// `history` holds several entries for one identity, the first one wins.
/// A candidate beyond `cap` ends the pass; succeeded scripts are skipped
/// without being compared to the cap.
pub fn determine_pending(
    scripts: &[ChangeScript],
    history: &[ChangeEntry],
    cap: Option<&ScriptIdentity>,
) -> Vec<PendingScript> {
    debug_assert!(
        ensure_ascending(scripts).is_ok(),
        "available scripts must be strictly ascending"
    );

    let mut applied: HashMap<&ScriptIdentity, &ChangeEntry> =
        HashMap::with_capacity(history.len());
    for entry in history {
        applied.entry(&entry.identity).or_insert(entry);
    }

    let mut pending = Vec::new();
    for script in scripts {
        let candidate = match applied.get(script.identity()) {
            None => PendingScript::new(script.clone()),
            Some(entry) if !entry.executed_successfully() => {
                PendingScript::rerun(script.clone(), entry.record_id)
            }
            Some(_) => continue,
        };

        if let Some(cap) = cap {
            if script.identity() > cap {
                break;
            }
        }
        pending.push(candidate);
    }

    pending
}

/// Journal entries recorded as failed.
///
/// Rows left in `Started` by an interrupted run are rerun by
/// [`determine_pending`] but are not reported here.
pub fn failed_entries(history: &[ChangeEntry]) -> Vec<ChangeEntry> {
    history
        .iter()
        .filter(|entry| entry.status == ScriptStatus::Failure)
        .cloned()
        .collect()
}

/// The journal entry recorded for `script`, if any (first match wins).
pub fn applied_entry<'a>(history: &'a [ChangeEntry], script: &ChangeScript) -> Option<&'a ChangeEntry> {
    history.iter().find(|entry| entry.matches(script))
}
