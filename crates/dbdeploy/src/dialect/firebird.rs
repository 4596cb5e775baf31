//! Firebird journal syntax.

use super::{Dialect, DialectRules, JournalTemplates, QuoteStyle, StringEscape, STANDARD_TEMPLATES};
use crate::render::DelimiterType;

const CREATE_TABLE: &str = "CREATE TABLE ${journal_table} (
    ChangeId CHAR(36) NOT NULL PRIMARY KEY,
    Folder VARCHAR(256) NOT NULL,
    ScriptNumber BIGINT NOT NULL,
    ScriptName VARCHAR(512) NOT NULL,
    StartDate TIMESTAMP NOT NULL,
    CompleteDate TIMESTAMP,
    AppliedBy VARCHAR(128) NOT NULL,
    ScriptStatus SMALLINT NOT NULL,
    ScriptOutput BLOB SUB_TYPE TEXT,
    UNIQUE (Folder, ScriptNumber)
)";

pub(super) const RULES: DialectRules = DialectRules {
    dialect: Dialect::Firebird,
    quote: QuoteStyle::DoubleQuotes,
    string_escape: StringEscape::Standard,
    current_timestamp: "CURRENT_TIMESTAMP",
    current_user: "CURRENT_USER",
    default_delimiter: ";",
    default_delimiter_type: DelimiterType::Normal,
    templates: JournalTemplates {
        create_table: CREATE_TABLE,
        ..STANDARD_TEMPLATES
    },
};
