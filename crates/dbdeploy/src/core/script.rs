//! Candidate change scripts.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::identity::ScriptIdentity;
use crate::error::Result;

/// Namespace for deterministic journal record identifiers.
const RECORD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_4c0e_9b2a_4f5e_8a3c_2e7b_1d90_c4a7);

/// Where a script's SQL text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptBody {
    /// Text already in memory.
    Inline(String),
    /// Text read from disk when first needed.
    File(PathBuf),
}

/// Immutable description of a candidate change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeScript {
    identity: ScriptIdentity,
    name: String,
    body: ScriptBody,
}

impl ChangeScript {
    /// Create a script whose body is held in memory.
    pub fn new(
        folder: impl Into<String>,
        number: u64,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            identity: ScriptIdentity::new(folder, number),
            name: name.into(),
            body: ScriptBody::Inline(content.into()),
        }
    }

    /// Create a script whose body is loaded from `path` at render time.
    pub fn from_file(identity: ScriptIdentity, name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            identity,
            name: name.into(),
            body: ScriptBody::File(path),
        }
    }

    pub fn identity(&self) -> &ScriptIdentity {
        &self.identity
    }

    pub fn folder(&self) -> &str {
        &self.identity.folder
    }

    pub fn number(&self) -> u64 {
        self.identity.number
    }

    /// File name of the script (e.g. `001_create_users.sql`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &ScriptBody {
        &self.body
    }

    /// Source path, if the body lives on disk.
    pub fn path(&self) -> Option<&Path> {
        match &self.body {
            ScriptBody::File(path) => Some(path),
            ScriptBody::Inline(_) => None,
        }
    }

    /// `folder/name`, or just `name` for unscoped scripts.
    pub fn display_name(&self) -> String {
        if self.identity.folder.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.identity.folder, self.name)
        }
    }

    /// Load the script text.
    pub fn load_content(&self) -> Result<Cow<'_, str>> {
        match &self.body {
            ScriptBody::Inline(text) => Ok(Cow::Borrowed(text)),
            ScriptBody::File(path) => Ok(Cow::Owned(std::fs::read_to_string(path)?)),
        }
    }

    /// Journal record identifier for a first execution of this script.
    ///
    /// Derived from identity and name so repeated renders produce the same text.
    pub fn new_record_id(&self) -> Uuid {
        let key = format!("{}|{}", self.identity, self.name);
        Uuid::new_v5(&RECORD_ID_NAMESPACE, key.as_bytes())
    }
}
