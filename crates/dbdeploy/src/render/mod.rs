//! Journal-wrapped rendering of pending change scripts.
//!
//! - [`DelimiterMode`]: how statement boundaries appear in output
//! - [`substitute`]: `${name}` placeholder resolution with a completeness check
//! - [`TemplateRenderer`]: builds the start marker, journal start statement,
//!   script body, journal completion statement and end marker for one script
//!
//! The renderer produces the same fragments whether they end up in a
//! consolidated document or are executed one by one; only the
//! [`crate::sink::StatementSink`] differs.

mod delimiter;
mod renderer;
mod template;

pub use delimiter::{DelimiterMode, DelimiterType};
pub use renderer::{RenderedChange, Statement, TemplateRenderer};
pub use template::{substitute, PLACEHOLDER_OPEN};
