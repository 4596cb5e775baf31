//! Available script sources.
//!
//! A source returns every candidate change script, sorted ascending by
//! identity. Reconciliation trusts that order; [`crate::reconcile::ChangeRepository`]
//! verifies it before use.

mod directory;

pub use directory::{parse_script_number, DirectoryScripts};

use async_trait::async_trait;

use crate::core::ChangeScript;
use crate::error::Result;

/// Provider of candidate change scripts.
#[async_trait]
pub trait AvailableScripts: Send + Sync {
    /// All candidate scripts, ascending by identity.
    async fn available_scripts(&self) -> Result<Vec<ChangeScript>>;

    /// Source type name for logging.
    fn source_type(&self) -> &'static str;
}

/// Fixed, in-memory list of scripts. Returned exactly as given.
#[derive(Debug, Clone, Default)]
pub struct StaticScripts {
    scripts: Vec<ChangeScript>,
}

impl StaticScripts {
    pub fn new(scripts: Vec<ChangeScript>) -> Self {
        Self { scripts }
    }
}

#[async_trait]
impl AvailableScripts for StaticScripts {
    async fn available_scripts(&self) -> Result<Vec<ChangeScript>> {
        Ok(self.scripts.clone())
    }

    fn source_type(&self) -> &'static str {
        "static"
    }
}
