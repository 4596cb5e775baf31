//! Oracle journal syntax.
//!
//! Oracle stores `''` as NULL, so Folder and ScriptOutput are nullable.

use super::{Dialect, DialectRules, JournalTemplates, QuoteStyle, StringEscape, STANDARD_TEMPLATES};
use crate::render::DelimiterType;

const CREATE_TABLE: &str = "CREATE TABLE ${journal_table} (
    ChangeId VARCHAR2(36) NOT NULL PRIMARY KEY,
    Folder VARCHAR2(256),
    ScriptNumber NUMBER(19) NOT NULL,
    ScriptName VARCHAR2(512) NOT NULL,
    StartDate TIMESTAMP NOT NULL,
    CompleteDate TIMESTAMP,
    AppliedBy VARCHAR2(128) NOT NULL,
    ScriptStatus NUMBER(3) NOT NULL,
    ScriptOutput CLOB,
    UNIQUE (Folder, ScriptNumber)
)";

pub(super) const RULES: DialectRules = DialectRules {
    dialect: Dialect::Oracle,
    quote: QuoteStyle::DoubleQuotes,
    string_escape: StringEscape::Standard,
    current_timestamp: "SYSTIMESTAMP",
    current_user: "USER",
    default_delimiter: ";",
    default_delimiter_type: DelimiterType::Normal,
    templates: JournalTemplates {
        create_table: CREATE_TABLE,
        ..STANDARD_TEMPLATES
    },
};
