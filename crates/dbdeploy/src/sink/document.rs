//! Consolidated script document.

use async_trait::async_trait;

use super::StatementSink;
use crate::error::Result;
use crate::render::{DelimiterMode, Statement};

/// Accumulates statements into a single SQL document.
///
/// Markers become `--` comment lines; SQL statements and script bodies are
/// terminated according to the delimiter mode and separated by blank lines.
#[derive(Debug, Clone)]
pub struct ScriptDocument {
    delimiter: DelimiterMode,
    text: String,
}

impl ScriptDocument {
    pub fn new(delimiter: DelimiterMode) -> Self {
        Self {
            delimiter,
            text: String::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a statement synchronously.
    pub fn push(&mut self, statement: &Statement) {
        match statement {
            Statement::Marker(text) => {
                self.text.push_str("-- ");
                self.text.push_str(text);
                self.text.push_str("\n\n");
            }
            Statement::Sql(text) | Statement::Script(text) => {
                self.text.push_str(&self.delimiter.terminate(text));
                self.text.push_str("\n\n");
            }
        }
    }
}

#[async_trait]
impl StatementSink for ScriptDocument {
    async fn submit(&mut self, statement: &Statement) -> Result<()> {
        self.push(statement);
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "document"
    }
}
