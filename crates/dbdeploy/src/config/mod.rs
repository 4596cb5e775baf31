//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;
pub use validation::validate_identifier;

use std::path::Path;

use tokio_postgres::Config as PgConfig;

use crate::core::ScriptIdentity;
use crate::dialect::{Dialect, DialectRules};
use crate::error::Result;
use crate::render::{DelimiterMode, TemplateRenderer};

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Resolved dialect rules.
    pub fn dialect_rules(&self) -> Result<&'static DialectRules> {
        Dialect::resolve(&self.dialect)
    }

    /// Delimiter mode, filling unset parts from the dialect defaults.
    pub fn delimiter_mode(&self) -> Result<DelimiterMode> {
        let rules = self.dialect_rules()?;
        let token = self
            .delimiter
            .as_deref()
            .unwrap_or(rules.default_delimiter);
        let kind = match self.delimiter_type.as_deref() {
            Some(kind) => kind.parse()?,
            None => rules.default_delimiter_type,
        };
        DelimiterMode::new(token, kind)
    }

    /// Parsed version cap, if any.
    pub fn last_change(&self) -> Result<Option<ScriptIdentity>> {
        self.last_change_to_apply
            .as_deref()
            .map(str::parse)
            .transpose()
    }

    /// Renderer for this configuration.
    pub fn renderer(&self) -> Result<TemplateRenderer> {
        TemplateRenderer::new(self.dialect_rules()?, &self.journal_table, self.delimiter_mode()?)
    }
}

impl ConnectionConfig {
    /// Build a tokio-postgres connection config.
    pub fn pg_config(&self) -> PgConfig {
        let mut pg_config = PgConfig::new();
        pg_config.host(&self.host);
        pg_config.port(self.port);
        pg_config.dbname(&self.database);
        pg_config.user(&self.user);
        pg_config.password(&self.password);
        pg_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DelimiterType;

    const MINIMAL: &str = "dialect: mssql\nscripts_dir: ./db/scripts\n";

    #[test]
    fn test_minimal_config_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.journal_table, "ChangeLog");
        assert!(!config.create_journal_table);
        assert!(config.connection.is_none());
        assert_eq!(config.last_change().unwrap(), None);

        let mode = config.delimiter_mode().unwrap();
        assert_eq!(mode.token(), "GO");
        assert_eq!(mode.kind(), DelimiterType::Row);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
dialect: pgsql
journal_table: deploy.change_log
scripts_dir: /srv/db
delimiter: ";"
delimiter_type: normal
last_change_to_apply: v2.0/7
create_journal_table: true
connection:
  host: localhost
  database: app
  user: deployer
  password: secret
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.last_change().unwrap(), Some(ScriptIdentity::new("v2.0", 7)));
        assert_eq!(config.connection.as_ref().unwrap().port, 5432);

        let renderer = config.renderer().unwrap();
        assert_eq!(renderer.journal_table(), "\"deploy\".\"change_log\"");
    }

    #[test]
    fn test_delimiter_override_keeps_dialect_type() {
        let config = Config::from_yaml("dialect: mssql\nscripts_dir: s\ndelimiter: ';'\n").unwrap();
        let mode = config.delimiter_mode().unwrap();
        assert_eq!(mode.token(), ";");
        assert_eq!(mode.kind(), DelimiterType::Row);
    }

    #[test]
    fn test_missing_dialect_is_yaml_error() {
        assert!(Config::from_yaml("scripts_dir: s\n").is_err());
    }

    #[test]
    fn test_pg_config_keeps_password_verbatim() {
        let conn = ConnectionConfig {
            host: "db".into(),
            port: 6543,
            database: "app".into(),
            user: "u".into(),
            password: "my sec\\ret".into(),
        };
        let pg = conn.pg_config();
        assert_eq!(pg.get_password(), Some("my sec\\ret".as_bytes()));
        assert_eq!(pg.get_ports(), &[6543]);
        assert_eq!(pg.get_dbname(), Some("app"));
        assert_eq!(pg.get_user(), Some("u"));
    }
}
