//! Statement delimiter conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dialect::DialectRules;
use crate::error::{DeployError, Result};

/// Where the delimiter token goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterType {
    /// Token terminates each statement on the same line (`...;`).
    Normal,
    /// Token sits alone on the following line, as a batch separator (`GO`).
    Row,
}

impl FromStr for DelimiterType {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(DelimiterType::Normal),
            "row" => Ok(DelimiterType::Row),
            _ => Err(DeployError::UnsupportedDelimiterMode(s.to_string())),
        }
    }
}

impl fmt::Display for DelimiterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterType::Normal => f.write_str("normal"),
            DelimiterType::Row => f.write_str("row"),
        }
    }
}

/// Delimiter token plus its placement policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterMode {
    token: String,
    kind: DelimiterType,
}

impl DelimiterMode {
    pub fn new(token: impl Into<String>, kind: DelimiterType) -> Result<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(DeployError::Config("delimiter cannot be empty".into()));
        }
        if token.contains('\n') {
            return Err(DeployError::Config(
                "delimiter cannot span multiple lines".into(),
            ));
        }
        Ok(Self {
            token: token.to_string(),
            kind,
        })
    }

    /// Build from configuration values, e.g. `(";", "normal")`.
    pub fn parse(token: &str, kind: &str) -> Result<Self> {
        Self::new(token, kind.parse()?)
    }

    /// The dialect's default convention.
    pub fn for_dialect(rules: &DialectRules) -> Self {
        Self {
            token: rules.default_delimiter.to_string(),
            kind: rules.default_delimiter_type,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn kind(&self) -> DelimiterType {
        self.kind
    }

    /// Append the delimiter to a statement for document output.
    ///
    /// A statement that already ends with the delimiter is left as is. When the
    /// last line carries a `--` comment the token goes on a line of its own.
    pub fn terminate(&self, statement: &str) -> String {
        let trimmed = statement.trim_end();
        match self.kind {
            DelimiterType::Normal => {
                let last_line = trimmed.lines().last().unwrap_or("");
                if last_line.contains("--") {
                    format!("{}\n{}", trimmed, self.token)
                } else if trimmed.ends_with(self.token.as_str()) {
                    trimmed.to_string()
                } else {
                    format!("{}{}", trimmed, self.token)
                }
            }
            DelimiterType::Row => {
                let last_line = trimmed.lines().last().unwrap_or("");
                if self.is_separator_line(last_line) {
                    trimmed.to_string()
                } else {
                    format!("{}\n{}", trimmed, self.token)
                }
            }
        }
    }

    /// Split a script into batches for direct execution.
    ///
    /// Row delimiters are client-side batch separators that servers do not
    /// understand, so the body is cut at each separator line. Normal
    /// delimiters stay inside the single batch.
    pub fn split_batches(&self, body: &str) -> Vec<String> {
        let batches: Vec<String> = match self.kind {
            DelimiterType::Normal => vec![body.to_string()],
            DelimiterType::Row => {
                let mut batches = Vec::new();
                let mut current = String::new();
                for line in body.lines() {
                    if self.is_separator_line(line) {
                        batches.push(std::mem::take(&mut current));
                    } else {
                        current.push_str(line);
                        current.push('\n');
                    }
                }
                batches.push(current);
                batches
            }
        };

        batches
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .collect()
    }

    fn is_separator_line(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(&self.token)
    }
}
