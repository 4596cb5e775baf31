//! Sybase ASE journal syntax.
//!
//! ASE has no UNIQUEIDENTIFIER type, so record ids are stored as text.

use super::{Dialect, DialectRules, JournalTemplates, QuoteStyle, StringEscape, STANDARD_TEMPLATES};
use crate::render::DelimiterType;

const CREATE_TABLE: &str = "CREATE TABLE ${journal_table} (
    ChangeId CHAR(36) NOT NULL PRIMARY KEY,
    Folder VARCHAR(256) NOT NULL,
    ScriptNumber NUMERIC(19, 0) NOT NULL,
    ScriptName VARCHAR(512) NOT NULL,
    StartDate DATETIME NOT NULL,
    CompleteDate DATETIME NULL,
    AppliedBy VARCHAR(128) NOT NULL,
    ScriptStatus TINYINT NOT NULL,
    ScriptOutput TEXT NULL,
    UNIQUE (Folder, ScriptNumber)
)";

pub(super) const RULES: DialectRules = DialectRules {
    dialect: Dialect::Sybase,
    quote: QuoteStyle::Brackets,
    string_escape: StringEscape::Standard,
    current_timestamp: "getdate()",
    current_user: "suser_name()",
    default_delimiter: "GO",
    default_delimiter_type: DelimiterType::Row,
    templates: JournalTemplates {
        create_table: CREATE_TABLE,
        ..STANDARD_TEMPLATES
    },
};
