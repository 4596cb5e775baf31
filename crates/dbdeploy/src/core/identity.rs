//! Script identity: `(folder, number)` with a total, transitive order.
//!
//! Folders compare in natural order so that `v2.0` sorts before `v10.0`.
//! Two folders that are naturally equal but textually different (`v01` and
//! `v1`) are ordered by their raw text, which keeps `Ord` consistent with `Eq`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DeployError, Result};

/// Ordered key identifying a logical change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptIdentity {
    /// Namespace segment (usually a version folder). Empty when unscoped.
    pub folder: String,
    /// Sequence number within the folder.
    pub number: u64,
}

impl ScriptIdentity {
    /// Create a new identity.
    pub fn new(folder: impl Into<String>, number: u64) -> Self {
        Self {
            folder: folder.into(),
            number,
        }
    }

    /// Identity without a folder segment.
    pub fn unscoped(number: u64) -> Self {
        Self::new(String::new(), number)
    }
}

impl Ord for ScriptIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        natural_cmp(&self.folder, &other.folder)
            .then_with(|| self.folder.cmp(&other.folder))
            .then_with(|| self.number.cmp(&other.number))
    }
}

impl PartialOrd for ScriptIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ScriptIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.folder.is_empty() {
            write!(f, "{}", self.number)
        } else {
            write!(f, "{}/{}", self.folder, self.number)
        }
    }
}

impl FromStr for ScriptIdentity {
    type Err = DeployError;

    /// Parse `folder/number` or a bare `number`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (folder, number) = match s.rsplit_once('/') {
            Some((folder, number)) => (folder, number),
            None => ("", s),
        };
        let number = number.parse::<u64>().map_err(|_| {
            DeployError::Config(format!(
                "invalid change identity '{}': expected 'folder/number' or 'number'",
                s
            ))
        })?;
        Ok(Self::new(folder, number))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;

    for (i, c) in s.char_indices() {
        let is_digit = c.is_ascii_digit();
        match in_digits {
            Some(prev) if prev != is_digit => {
                out.push(segment(&s[start..i], prev));
                start = i;
            }
            _ => {}
        }
        in_digits = Some(is_digit);
    }
    if let Some(prev) = in_digits {
        out.push(segment(&s[start..], prev));
    }
    out
}

fn segment(text: &str, digits: bool) -> Segment<'_> {
    if digits {
        Segment::Digits(text)
    } else {
        Segment::Text(text)
    }
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural ordering: digit runs compare by value, text runs by bytes.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = segments(a);
    let right = segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Segment::Digits(x), Segment::Digits(y)) => cmp_digits(x, y),
            (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
            (Segment::Digits(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_order_within_folder() {
        assert!(ScriptIdentity::new("v1.0", 2) < ScriptIdentity::new("v1.0", 10));
    }

    #[test]
    fn test_folder_dominates_number() {
        assert!(ScriptIdentity::new("v1.0", 99) < ScriptIdentity::new("v2.0", 1));
    }

    #[test]
    fn test_natural_folder_order() {
        assert!(ScriptIdentity::new("v2.0", 1) < ScriptIdentity::new("v10.0", 1));
        assert!(ScriptIdentity::new("v1.9", 1) < ScriptIdentity::new("v1.10", 1));
    }

    #[test]
    fn test_unscoped_sorts_first() {
        assert!(ScriptIdentity::unscoped(500) < ScriptIdentity::new("v1.0", 1));
    }

    #[test]
    fn test_order_consistent_with_eq() {
        let a = ScriptIdentity::new("v01", 1);
        let b = ScriptIdentity::new("v1", 1);
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_sort_is_total() {
        let mut ids = vec![
            ScriptIdentity::new("v10", 1),
            ScriptIdentity::new("v1", 3),
            ScriptIdentity::new("v01", 2),
            ScriptIdentity::unscoped(7),
            ScriptIdentity::new("v2", 1),
            ScriptIdentity::new("v1", 1),
        ];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
        assert_eq!(rendered, vec!["7", "v01/2", "v1/1", "v1/3", "v2/1", "v10/1"]);
    }

    #[test]
    fn test_parse_identity() {
        let id: ScriptIdentity = "v1.0/5".parse().unwrap();
        assert_eq!(id, ScriptIdentity::new("v1.0", 5));

        let bare: ScriptIdentity = "42".parse().unwrap();
        assert_eq!(bare, ScriptIdentity::unscoped(42));

        let nested: ScriptIdentity = "release/v3/12".parse().unwrap();
        assert_eq!(nested.folder, "release/v3");
        assert_eq!(nested.number, 12);
    }

    #[test]
    fn test_parse_invalid_identity() {
        assert!("v1.0/abc".parse::<ScriptIdentity>().is_err());
        assert!("".parse::<ScriptIdentity>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(ScriptIdentity::new("v1.0", 3).to_string(), "v1.0/3");
        assert_eq!(ScriptIdentity::unscoped(3).to_string(), "3");
    }
}
