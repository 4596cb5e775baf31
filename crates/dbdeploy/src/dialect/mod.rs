//! SQL dialect rules for the change journal.
//!
//! Each supported database is a variant of [`Dialect`] with one static
//! [`DialectRules`] value defined in its own module. The rules carry
//! everything the renderer needs to write journal statements for that
//! database: identifier quoting, string escaping, current timestamp and
//! current user expressions, the default statement delimiter, and the
//! statement templates.
//!
//! # Adding a database
//!
//! 1. Create `dialect/<name>.rs` with a `RULES` constant
//! 2. Add a variant to [`Dialect`] and extend [`Dialect::ALL`],
//!    [`Dialect::name`], [`Dialect::rules`] and the `FromStr` aliases

mod firebird;
mod mssql;
mod mysql;
mod oracle;
mod postgres;
mod sybase;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, Result};
use crate::render::DelimiterType;

/// Supported target databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mssql,
    Mysql,
    Oracle,
    Firebird,
    Postgres,
    Sybase,
}

impl Dialect {
    /// Every supported dialect, in declaration order.
    pub const ALL: [Dialect; 6] = [
        Dialect::Mssql,
        Dialect::Mysql,
        Dialect::Oracle,
        Dialect::Firebird,
        Dialect::Postgres,
        Dialect::Sybase,
    ];

    /// Canonical configuration name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Mssql => "mssql",
            Dialect::Mysql => "mysql",
            Dialect::Oracle => "ora",
            Dialect::Firebird => "firebird",
            Dialect::Postgres => "pgsql",
            Dialect::Sybase => "sybase",
        }
    }

    pub fn rules(self) -> &'static DialectRules {
        match self {
            Dialect::Mssql => &mssql::RULES,
            Dialect::Mysql => &mysql::RULES,
            Dialect::Oracle => &oracle::RULES,
            Dialect::Firebird => &firebird::RULES,
            Dialect::Postgres => &postgres::RULES,
            Dialect::Sybase => &sybase::RULES,
        }
    }

    /// Look up the rules for a configured dialect name.
    pub fn resolve(name: &str) -> Result<&'static DialectRules> {
        name.parse::<Dialect>().map(Dialect::rules)
    }
}

impl FromStr for Dialect {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mssql" | "sqlserver" => Ok(Dialect::Mssql),
            "mysql" => Ok(Dialect::Mysql),
            "ora" | "oracle" => Ok(Dialect::Oracle),
            "firebird" => Ok(Dialect::Firebird),
            "pgsql" | "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "sybase" | "syb-ase" => Ok(Dialect::Sybase),
            _ => Err(DeployError::UnsupportedDialect(s.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How identifiers are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `[name]`, closing brackets doubled.
    Brackets,
    /// `"name"`, double quotes doubled.
    DoubleQuotes,
    /// `` `name` ``, backticks doubled.
    Backticks,
}

/// How string literals are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEscape {
    /// Single quotes doubled.
    Standard,
    /// Single quotes doubled and backslashes escaped (MySQL default mode).
    Backslash,
}

/// Statement templates for journal bookkeeping.
///
/// Placeholders use `${name}` syntax and are resolved by
/// [`crate::render::substitute`].
#[derive(Debug, Clone, Copy)]
pub struct JournalTemplates {
    /// New journal row in `Started` status.
    pub insert: &'static str,
    /// Reset an existing row to `Started` before a rerun.
    pub restart: &'static str,
    /// Record the outcome of a script.
    pub complete: &'static str,
    /// Journal table DDL.
    pub create_table: &'static str,
}

pub(crate) const STANDARD_TEMPLATES: JournalTemplates = JournalTemplates {
    insert: "INSERT INTO ${journal_table} (ChangeId, Folder, ScriptNumber, ScriptName, StartDate, AppliedBy, ScriptStatus, ScriptOutput) \
             VALUES (${record_id}, ${folder}, ${script_number}, ${script_name}, ${now}, ${current_user}, ${status}, '')",
    restart: "UPDATE ${journal_table} SET StartDate = ${now}, CompleteDate = NULL, AppliedBy = ${current_user}, \
              ScriptStatus = ${status}, ScriptOutput = '' WHERE ChangeId = ${record_id}",
    complete: "UPDATE ${journal_table} SET CompleteDate = ${now}, ScriptStatus = ${status}, \
               ScriptOutput = ${output} WHERE ChangeId = ${record_id}",
    create_table: "",
};

/// Per-database syntax for the journal.
#[derive(Debug, Clone, Copy)]
pub struct DialectRules {
    pub dialect: Dialect,
    pub quote: QuoteStyle,
    pub string_escape: StringEscape,
    /// Expression yielding the current date/time.
    pub current_timestamp: &'static str,
    /// Expression yielding the executing principal.
    pub current_user: &'static str,
    /// Statement delimiter used when none is configured.
    pub default_delimiter: &'static str,
    pub default_delimiter_type: DelimiterType,
    pub templates: JournalTemplates,
}

impl DialectRules {
    pub fn name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Quote a single identifier.
    pub fn quote_ident(&self, name: &str) -> String {
        match self.quote {
            QuoteStyle::Brackets => format!("[{}]", name.replace(']', "]]")),
            QuoteStyle::DoubleQuotes => format!("\"{}\"", name.replace('"', "\"\"")),
            QuoteStyle::Backticks => format!("`{}`", name.replace('`', "``")),
        }
    }

    /// Quote a possibly schema-qualified table name (`schema.table`).
    pub fn quote_table(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote_ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Render a string literal, including the surrounding quotes.
    pub fn string_literal(&self, value: &str) -> String {
        let escaped = match self.string_escape {
            StringEscape::Standard => value.replace('\'', "''"),
            StringEscape::Backslash => value.replace('\\', "\\\\").replace('\'', "''"),
        };
        format!("'{}'", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_canonical_names() {
        for dialect in Dialect::ALL {
            let rules = Dialect::resolve(dialect.name()).unwrap();
            assert_eq!(rules.dialect, dialect);
            assert_eq!(rules.name(), dialect.name());
        }
    }

    #[test]
    fn test_resolve_aliases() {
        assert_eq!(Dialect::resolve("postgres").unwrap().dialect, Dialect::Postgres);
        assert_eq!(Dialect::resolve("Oracle").unwrap().dialect, Dialect::Oracle);
        assert_eq!(Dialect::resolve("syb-ase").unwrap().dialect, Dialect::Sybase);
        assert_eq!(Dialect::resolve(" MSSQL ").unwrap().dialect, Dialect::Mssql);
    }

    #[test]
    fn test_unsupported_dialect() {
        let err = Dialect::resolve("db2").unwrap_err();
        assert!(matches!(err, DeployError::UnsupportedDialect(ref name) if name == "db2"));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(Dialect::Mssql.rules().quote_ident("Change]Log"), "[Change]]Log]");
        assert_eq!(Dialect::Postgres.rules().quote_ident("Change\"Log"), "\"Change\"\"Log\"");
        assert_eq!(Dialect::Mysql.rules().quote_ident("Change`Log"), "`Change``Log`");
    }

    #[test]
    fn test_quote_qualified_table() {
        assert_eq!(Dialect::Mssql.rules().quote_table("dbo.ChangeLog"), "[dbo].[ChangeLog]");
        assert_eq!(Dialect::Postgres.rules().quote_table("ChangeLog"), "\"ChangeLog\"");
    }

    #[test]
    fn test_string_literal_escaping() {
        assert_eq!(Dialect::Postgres.rules().string_literal("it's"), "'it''s'");
        assert_eq!(Dialect::Mysql.rules().string_literal(r"C:\it's"), r"'C:\\it''s'");
        assert_eq!(Dialect::Mssql.rules().string_literal(r"C:\x"), r"'C:\x'");
    }

    #[test]
    fn test_every_dialect_has_table_ddl() {
        for dialect in Dialect::ALL {
            let ddl = dialect.rules().templates.create_table;
            assert!(ddl.starts_with("CREATE TABLE ${journal_table}"), "{}", dialect);
            for column in ["ChangeId", "Folder", "ScriptNumber", "ScriptName", "StartDate",
                           "CompleteDate", "AppliedBy", "ScriptStatus", "ScriptOutput"] {
                assert!(ddl.contains(column), "{} DDL lacks {}", dialect, column);
            }
        }
    }

    #[test]
    fn test_batch_separator_defaults() {
        assert_eq!(Dialect::Mssql.rules().default_delimiter, "GO");
        assert_eq!(Dialect::Mssql.rules().default_delimiter_type, DelimiterType::Row);
        assert_eq!(Dialect::Postgres.rules().default_delimiter, ";");
        assert_eq!(Dialect::Postgres.rules().default_delimiter_type, DelimiterType::Normal);
    }
}
