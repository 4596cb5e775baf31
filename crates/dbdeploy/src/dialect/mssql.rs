//! Microsoft SQL Server journal syntax.

use super::{Dialect, DialectRules, JournalTemplates, QuoteStyle, StringEscape, STANDARD_TEMPLATES};
use crate::render::DelimiterType;

const CREATE_TABLE: &str = "CREATE TABLE ${journal_table} (
    ChangeId UNIQUEIDENTIFIER NOT NULL PRIMARY KEY,
    Folder NVARCHAR(256) NOT NULL,
    ScriptNumber BIGINT NOT NULL,
    ScriptName NVARCHAR(512) NOT NULL,
    StartDate DATETIME NOT NULL,
    CompleteDate DATETIME NULL,
    AppliedBy NVARCHAR(128) NOT NULL,
    ScriptStatus TINYINT NOT NULL,
    ScriptOutput NVARCHAR(MAX) NOT NULL,
    UNIQUE (Folder, ScriptNumber)
)";

pub(super) const RULES: DialectRules = DialectRules {
    dialect: Dialect::Mssql,
    quote: QuoteStyle::Brackets,
    string_escape: StringEscape::Standard,
    current_timestamp: "getdate()",
    current_user: "user_name()",
    default_delimiter: "GO",
    default_delimiter_type: DelimiterType::Row,
    templates: JournalTemplates {
        create_table: CREATE_TABLE,
        ..STANDARD_TEMPLATES
    },
};
