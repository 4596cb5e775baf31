//! History source for targets without a readable journal.
//!
//! Used when generating a consolidated script offline: every available
//! script is treated as new.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::warn;

use super::ChangeHistory;
use crate::core::ChangeEntry;
use crate::error::Result;

/// History source that reports no applied changes.
///
/// Logs a warning on first use.
pub struct EmptyHistory {
    warned: AtomicBool,
}

impl EmptyHistory {
    pub fn new() -> Self {
        Self {
            warned: AtomicBool::new(false),
        }
    }

    fn warn_once(&self) {
        if !self.warned.swap(true, Ordering::SeqCst) {
            warn!(
                "No journal connection configured: all available scripts are treated as \
                 not yet applied."
            );
        }
    }
}

impl Default for EmptyHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeHistory for EmptyHistory {
    async fn applied_changes(&self) -> Result<Vec<ChangeEntry>> {
        self.warn_once();
        Ok(Vec::new())
    }

    fn backend_type(&self) -> &'static str {
        "empty"
    }
}
