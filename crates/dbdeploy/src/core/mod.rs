//! Core types shared by reconciliation and rendering.
//!
//! - [`identity`]: the ordered key that identifies a logical change
//! - [`script`]: candidate change scripts and their lazily loaded bodies
//! - [`entry`]: journal rows describing changes already attempted
//!
//! These types carry no database-specific behavior. Dialect syntax lives in
//! [`crate::dialect`] and statement construction in [`crate::render`].

pub mod entry;
pub mod identity;
pub mod script;

pub use entry::{ChangeEntry, ScriptStatus};
pub use identity::ScriptIdentity;
pub use script::{ChangeScript, ScriptBody};
