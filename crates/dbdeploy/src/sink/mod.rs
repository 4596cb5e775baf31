//! Execution sinks.
//!
//! A sink receives the rendered [`Statement`]s in submission order and either
//! accumulates them into one document ([`ScriptDocument`]) or runs them
//! against a live connection ([`PgExecutor`]). Sinks must preserve order.

mod document;
mod postgres;

pub use document::ScriptDocument;
pub use postgres::PgExecutor;

use async_trait::async_trait;

use crate::error::Result;
use crate::render::Statement;

/// Destination for rendered statements.
#[async_trait]
pub trait StatementSink: Send {
    /// Submit one statement. Live sinks execute it before returning.
    async fn submit(&mut self, statement: &Statement) -> Result<()>;

    /// Sink type name for logging.
    fn sink_type(&self) -> &'static str;
}
