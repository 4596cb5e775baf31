//! Journal entries: what has already been attempted against the target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identity::ScriptIdentity;
use super::script::ChangeScript;
use crate::error::{DeployError, Result};

/// Execution status stored in the journal's `ScriptStatus` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    Failure,
    Success,
    ProblemResolved,
    Started,
}

impl ScriptStatus {
    /// Integer code written to the journal.
    pub fn code(self) -> i32 {
        match self {
            ScriptStatus::Failure => 0,
            ScriptStatus::Success => 1,
            ScriptStatus::ProblemResolved => 2,
            ScriptStatus::Started => 3,
        }
    }

    /// Parse a journal status code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(ScriptStatus::Failure),
            1 => Ok(ScriptStatus::Success),
            2 => Ok(ScriptStatus::ProblemResolved),
            3 => Ok(ScriptStatus::Started),
            _ => Err(DeployError::Config(format!(
                "Invalid script status code: {}",
                code
            ))),
        }
    }

    /// Whether a change with this status must not be applied again.
    pub fn executed_successfully(self) -> bool {
        matches!(self, ScriptStatus::Success | ScriptStatus::ProblemResolved)
    }
}

/// A row of the change journal. Never mutated once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub record_id: Uuid,
    pub identity: ScriptIdentity,
    pub name: String,
    pub status: ScriptStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub applied_by: Option<String>,
    pub output: Option<String>,
}

impl ChangeEntry {
    /// Minimal entry, mostly useful for tests and in-memory history.
    pub fn new(record_id: Uuid, identity: ScriptIdentity, status: ScriptStatus) -> Self {
        Self {
            record_id,
            identity,
            name: String::new(),
            status,
            started_at: None,
            completed_at: None,
            applied_by: None,
            output: None,
        }
    }

    pub fn executed_successfully(&self) -> bool {
        self.status.executed_successfully()
    }

    /// Whether this entry records the given script.
    pub fn matches(&self, script: &ChangeScript) -> bool {
        &self.identity == script.identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        for status in [
            ScriptStatus::Failure,
            ScriptStatus::Success,
            ScriptStatus::ProblemResolved,
            ScriptStatus::Started,
        ] {
            assert_eq!(ScriptStatus::from_code(status.code()).unwrap(), status);
        }
        assert!(ScriptStatus::from_code(9).is_err());
    }

    #[test]
    fn test_only_success_and_resolved_count_as_applied() {
        assert!(ScriptStatus::Success.executed_successfully());
        assert!(ScriptStatus::ProblemResolved.executed_successfully());
        assert!(!ScriptStatus::Failure.executed_successfully());
        assert!(!ScriptStatus::Started.executed_successfully());
    }

    #[test]
    fn test_matches_by_identity() {
        let script = ChangeScript::new("v1.0", 2, "002_change.sql", "");
        let entry = ChangeEntry::new(
            Uuid::nil(),
            ScriptIdentity::new("v1.0", 2),
            ScriptStatus::Success,
        );
        assert!(entry.matches(&script));

        let other = ChangeEntry::new(
            Uuid::nil(),
            ScriptIdentity::new("v1.1", 2),
            ScriptStatus::Success,
        );
        assert!(!other.matches(&script));
    }
}
