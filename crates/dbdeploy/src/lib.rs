//! # dbdeploy
//!
//! Database change-script deployment library.
//!
//! This library determines which numbered SQL change scripts still need to be
//! applied to a database and turns them into journal-wrapped SQL:
//!
//! - **Reconciliation** of available scripts against a change journal table
//! - **Reruns** of scripts whose earlier attempt did not succeed
//! - **Dialect rules** for MSSQL, MySQL, Oracle, Firebird, PostgreSQL and Sybase
//! - **Sinks** that either build one SQL document or execute against PostgreSQL
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use dbdeploy::{ChangeRepository, Config, Deployer, DirectoryScripts, EmptyHistory, ScriptDocument};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> dbdeploy::Result<()> {
//!     let config = Config::load("dbdeploy.yaml")?;
//!     let renderer = config.renderer()?;
//!     let repository = ChangeRepository::new(
//!         Arc::new(DirectoryScripts::new(&config.scripts_dir)),
//!         Arc::new(EmptyHistory::new()),
//!     );
//!
//!     let mut document = ScriptDocument::new(renderer.delimiter().clone());
//!     let deployer = Deployer::new(repository, renderer);
//!     let cap = config.last_change()?;
//!     deployer.run(&mut document, cap.as_ref(), &CancellationToken::new()).await?;
//!     println!("{}", document.as_str());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod reconcile;
pub mod render;
pub mod sink;
pub mod source;

// Re-exports for convenient access
pub use config::{Config, ConnectionConfig};
pub use crate::core::{ChangeEntry, ChangeScript, ScriptIdentity, ScriptStatus};
pub use dialect::{Dialect, DialectRules};
pub use error::{DeployError, Result};
pub use history::{ChangeHistory, EmptyHistory, PgJournal, StaticHistory};
pub use orchestrator::{DeployReport, Deployer};
pub use reconcile::{determine_pending, ChangeRepository, PendingScript, Reconciliation};
pub use render::{DelimiterMode, DelimiterType, Statement, TemplateRenderer};
pub use sink::{PgExecutor, ScriptDocument, StatementSink};
pub use source::{AvailableScripts, DirectoryScripts, StaticScripts};
