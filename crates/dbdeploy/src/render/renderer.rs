//! Templated renderer for journal-wrapped change scripts.

use uuid::Uuid;

use super::delimiter::DelimiterMode;
use super::template::substitute;
use crate::core::{ScriptIdentity, ScriptStatus};
use crate::dialect::DialectRules;
use crate::error::{DeployError, Result};
use crate::reconcile::PendingScript;

/// One unit submitted to a [`crate::sink::StatementSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Informational comment line. Never executed.
    Marker(String),
    /// Journal bookkeeping statement.
    Sql(String),
    /// Literal body of a change script.
    Script(String),
}

/// All fragments for one pending script, in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChange {
    pub identity: ScriptIdentity,
    pub display_name: String,
    pub record_id: Uuid,
    pub rerun: bool,
    pub start_marker: String,
    /// INSERT of a new journal row, or UPDATE back to `Started` on rerun.
    pub journal_start: String,
    pub body: String,
    /// UPDATE recording success.
    pub journal_complete: String,
    pub end_marker: String,
}

impl RenderedChange {
    /// Fragments in the order they must be submitted.
    pub fn statements(&self) -> Vec<Statement> {
        vec![
            Statement::Marker(self.start_marker.clone()),
            Statement::Sql(self.journal_start.clone()),
            Statement::Script(self.body.clone()),
            Statement::Sql(self.journal_complete.clone()),
            Statement::Marker(self.end_marker.clone()),
        ]
    }
}

/// Builds journal-wrapped SQL for pending scripts in one dialect.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    rules: &'static DialectRules,
    journal_table: String,
    delimiter: DelimiterMode,
}

impl TemplateRenderer {
    /// Create a renderer writing to `journal_table` (optionally `schema.table`).
    pub fn new(
        rules: &'static DialectRules,
        journal_table: &str,
        delimiter: DelimiterMode,
    ) -> Result<Self> {
        let journal_table = journal_table.trim();
        if journal_table.is_empty() || journal_table.split('.').any(|p| p.is_empty()) {
            return Err(DeployError::substitution("journal table", "journal_table"));
        }

        Ok(Self {
            rules,
            journal_table: rules.quote_table(journal_table),
            delimiter,
        })
    }

    pub fn rules(&self) -> &'static DialectRules {
        self.rules
    }

    pub fn delimiter(&self) -> &DelimiterMode {
        &self.delimiter
    }

    /// Journal table name as it appears in statements (quoted).
    pub fn journal_table(&self) -> &str {
        &self.journal_table
    }

    /// Render one pending script.
    pub fn render(&self, pending: &PendingScript) -> Result<RenderedChange> {
        let script = &pending.script;
        let display_name = single_line(&script.display_name());

        if script.name().trim().is_empty() {
            return Err(DeployError::substitution(
                script.identity().to_string(),
                "script_name",
            ));
        }

        let record_id = pending.record_id();
        let record_literal = self.rules.string_literal(&record_id.to_string());
        let folder = self.rules.string_literal(script.folder());
        let number = script.number().to_string();
        let name = self.rules.string_literal(script.name());
        let status = ScriptStatus::Started.code().to_string();

        let values = [
            ("journal_table", self.journal_table.as_str()),
            ("record_id", record_literal.as_str()),
            ("folder", folder.as_str()),
            ("script_number", number.as_str()),
            ("script_name", name.as_str()),
            ("now", self.rules.current_timestamp),
            ("current_user", self.rules.current_user),
            ("status", status.as_str()),
        ];

        let template = if pending.is_rerun() {
            self.rules.templates.restart
        } else {
            self.rules.templates.insert
        };
        let journal_start = substitute(template, &values, &display_name)?;
        let journal_complete =
            self.completion(&display_name, &record_literal, ScriptStatus::Success, "")?;
        let body = script.load_content()?.into_owned();

        Ok(RenderedChange {
            identity: script.identity().clone(),
            record_id,
            rerun: pending.is_rerun(),
            start_marker: format!("START CHANGE SCRIPT {}", display_name),
            journal_start,
            body,
            journal_complete,
            end_marker: format!("END CHANGE SCRIPT {}", display_name),
            display_name,
        })
    }

    /// Journal update recording that `change` failed with `output`.
    pub fn render_failure(&self, change: &RenderedChange, output: &str) -> Result<String> {
        let record_literal = self.rules.string_literal(&change.record_id.to_string());
        self.completion(
            &change.display_name,
            &record_literal,
            ScriptStatus::Failure,
            output,
        )
    }

    /// CREATE TABLE statement for the journal.
    pub fn render_journal_ddl(&self) -> Result<String> {
        substitute(
            self.rules.templates.create_table,
            &[("journal_table", self.journal_table.as_str())],
            "journal table",
        )
    }

    fn completion(
        &self,
        display_name: &str,
        record_literal: &str,
        status: ScriptStatus,
        output: &str,
    ) -> Result<String> {
        let status = status.code().to_string();
        let output = self.rules.string_literal(output);
        substitute(
            self.rules.templates.complete,
            &[
                ("journal_table", self.journal_table.as_str()),
                ("record_id", record_literal),
                ("now", self.rules.current_timestamp),
                ("status", status.as_str()),
                ("output", output.as_str()),
            ],
            display_name,
        )
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
