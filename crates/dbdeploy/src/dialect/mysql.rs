//! MySQL journal syntax.

use super::{Dialect, DialectRules, JournalTemplates, QuoteStyle, StringEscape, STANDARD_TEMPLATES};
use crate::render::DelimiterType;

const CREATE_TABLE: &str = "CREATE TABLE ${journal_table} (
    ChangeId CHAR(36) NOT NULL PRIMARY KEY,
    Folder VARCHAR(255) NOT NULL,
    ScriptNumber BIGINT NOT NULL,
    ScriptName VARCHAR(512) NOT NULL,
    StartDate DATETIME NOT NULL,
    CompleteDate DATETIME NULL,
    AppliedBy VARCHAR(128) NOT NULL,
    ScriptStatus TINYINT NOT NULL,
    ScriptOutput LONGTEXT NOT NULL,
    UNIQUE KEY (Folder, ScriptNumber)
)";

pub(super) const RULES: DialectRules = DialectRules {
    dialect: Dialect::Mysql,
    quote: QuoteStyle::Backticks,
    string_escape: StringEscape::Backslash,
    current_timestamp: "CURRENT_TIMESTAMP",
    current_user: "USER()",
    default_delimiter: ";",
    default_delimiter_type: DelimiterType::Normal,
    templates: JournalTemplates {
        create_table: CREATE_TABLE,
        ..STANDARD_TEMPLATES
    },
};
