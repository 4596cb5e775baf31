//! `${name}` placeholder substitution.

use crate::error::{DeployError, Result};

/// Opening sequence of a placeholder.
pub const PLACEHOLDER_OPEN: &str = "${";

/// Replace every `${name}` in `template` with its value.
///
/// Values are inserted verbatim and never rescanned. Any placeholder without
/// a value, or an unterminated `${`, fails with
/// [`DeployError::TemplateSubstitution`] naming `script`.
pub fn substitute(template: &str, values: &[(&str, &str)], script: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];
        let end = after
            .find('}')
            .ok_or_else(|| DeployError::substitution(script, after))?;
        let name = &after[..end];
        let value = values
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| DeployError::substitution(script, name))?;
        out.push_str(value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitute_all() {
        let out = substitute(
            "UPDATE ${t} SET x = ${v} WHERE id = ${v}",
            &[("t", "log"), ("v", "1")],
            "s",
        )
        .unwrap();
        assert_eq!(out, "UPDATE log SET x = 1 WHERE id = 1");
    }

    #[test]
    fn test_missing_value_names_field() {
        let err = substitute("SELECT ${missing}", &[], "v1.0/001.sql").unwrap_err();
        match err {
            DeployError::TemplateSubstitution { script, field } => {
                assert_eq!(script, "v1.0/001.sql");
                assert_eq!(field, "missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(substitute("SELECT ${oops", &[("oops", "1")], "s").is_err());
    }

    #[test]
    fn test_values_not_rescanned() {
        let out = substitute("${a}", &[("a", "${b}"), ("b", "x")], "s").unwrap();
        assert_eq!(out, "${b}");
    }

    #[test]
    fn test_plain_dollar_untouched() {
        let out = substitute("SELECT '$5' || $1", &[], "s").unwrap();
        assert_eq!(out, "SELECT '$5' || $1");
    }
}
