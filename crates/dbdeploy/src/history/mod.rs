//! Change history sources.
//!
//! A [`ChangeHistory`] exposes every journal row already written for the
//! target database, in any order. Implementations:
//!
//! - [`StaticHistory`]: fixed in-memory entries
//! - [`EmptyHistory`]: no journal available (offline script generation)
//! - [`PgJournal`]: reads the journal table from PostgreSQL

mod empty;
mod postgres;

pub use empty::EmptyHistory;
pub use postgres::{connect, PgJournal};

use async_trait::async_trait;

use crate::core::ChangeEntry;
use crate::error::Result;

/// Provider of previously applied change records.
#[async_trait]
pub trait ChangeHistory: Send + Sync {
    /// Full journal, no pagination.
    async fn applied_changes(&self) -> Result<Vec<ChangeEntry>>;

    /// Backend type name for logging.
    fn backend_type(&self) -> &'static str;
}

/// Fixed, in-memory journal.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    entries: Vec<ChangeEntry>,
}

impl StaticHistory {
    pub fn new(entries: Vec<ChangeEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl ChangeHistory for StaticHistory {
    async fn applied_changes(&self) -> Result<Vec<ChangeEntry>> {
        Ok(self.entries.clone())
    }

    fn backend_type(&self) -> &'static str {
        "static"
    }
}
