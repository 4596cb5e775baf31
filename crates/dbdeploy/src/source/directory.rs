//! Change scripts discovered on disk.
//!
//! Layout:
//!
//! ```text
//! scripts/
//!   001_bootstrap.sql        -> identity "1"
//!   v1.0/001_users.sql       -> identity "v1.0/1"
//!   v1.0/002_orders.sql      -> identity "v1.0/2"
//!   v2.0/001_audit.sql       -> identity "v2.0/1"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use super::AvailableScripts;
use crate::core::{ChangeScript, ScriptIdentity};
use crate::error::{DeployError, Result};

/// Scans a root directory and its immediate sub-directories for `.sql` files.
#[derive(Debug, Clone)]
pub struct DirectoryScripts {
    root: PathBuf,
}

impl DirectoryScripts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover scripts, sorted ascending by identity.
    pub fn scan(&self) -> Result<Vec<ChangeScript>> {
        if !self.root.is_dir() {
            return Err(DeployError::ScriptDiscovery(format!(
                "scripts directory not found: {}",
                self.root.display()
            )));
        }

        let mut scripts = Vec::new();
        collect_scripts(&self.root, "", &mut scripts)?;

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let folder = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    DeployError::ScriptDiscovery(format!(
                        "folder name is not valid UTF-8: {}",
                        path.display()
                    ))
                })?
                .to_string();
            if folder.starts_with('.') {
                continue;
            }
            collect_scripts(&path, &folder, &mut scripts)?;
        }

        scripts.sort_by(|a, b| a.identity().cmp(b.identity()));

        for pair in scripts.windows(2) {
            if pair[0].identity() == pair[1].identity() {
                return Err(DeployError::ScriptDiscovery(format!(
                    "duplicate change number {}: {} and {}",
                    pair[0].identity(),
                    pair[0].display_name(),
                    pair[1].display_name()
                )));
            }
        }

        debug!(
            "Discovered {} change scripts under {}",
            scripts.len(),
            self.root.display()
        );
        Ok(scripts)
    }
}

#[async_trait]
impl AvailableScripts for DirectoryScripts {
    async fn available_scripts(&self) -> Result<Vec<ChangeScript>> {
        self.scan()
    }

    fn source_type(&self) -> &'static str {
        "directory"
    }
}

fn collect_scripts(dir: &Path, folder: &str, out: &mut Vec<ChangeScript>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !is_sql_file(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping script with non UTF-8 name: {}", path.display());
            continue;
        };
        match parse_script_number(name)? {
            Some(number) => {
                let name = name.to_string();
                out.push(ChangeScript::from_file(
                    ScriptIdentity::new(folder, number),
                    name,
                    path,
                ));
            }
            None => warn!("Skipping {}: file name has no leading change number", path.display()),
        }
    }
    Ok(())
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("sql"))
        .unwrap_or(false)
}

/// Leading decimal digits of a script file name (`042_add_index.sql` -> 42).
///
/// `Ok(None)` when the name does not start with a digit. A number too large
/// for `u64` is a discovery error.
pub fn parse_script_number(file_name: &str) -> Result<Option<u64>> {
    let end = file_name
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(file_name.len());
    let digits = &file_name[..end];
    if digits.is_empty() {
        return Ok(None);
    }
    digits.parse().map(Some).map_err(|_| {
        DeployError::ScriptDiscovery(format!(
            "change number in {} does not fit in 64 bits",
            file_name
        ))
    })
}
