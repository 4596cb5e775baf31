//! Compact range summaries of script identities for logging.

use crate::core::ScriptIdentity;

/// Summarize ascending identities as per-folder ranges.
///
/// `[v1.0/1, v1.0/2, v1.0/3, v1.0/5, v2.0/1]` becomes `v1.0: 1..3, 5; v2.0: 1`.
/// Unscoped identities are listed without a folder prefix.
pub fn summarize_identities<'a, I>(identities: I) -> String
where
    I: IntoIterator<Item = &'a ScriptIdentity>,
{
    let mut groups: Vec<(&str, Vec<(u64, u64)>)> = Vec::new();

    for id in identities {
        if let Some((folder, ranges)) = groups.last_mut() {
            if *folder == id.folder.as_str() {
                match ranges.last_mut() {
                    Some(last) if id.number == last.1 + 1 => last.1 = id.number,
                    _ => ranges.push((id.number, id.number)),
                }
                continue;
            }
        }
        groups.push((id.folder.as_str(), vec![(id.number, id.number)]));
    }

    if groups.is_empty() {
        return "(none)".to_string();
    }

    groups
        .iter()
        .map(|(folder, ranges)| {
            let ranges = ranges
                .iter()
                .map(|(start, end)| {
                    if start == end {
                        start.to_string()
                    } else {
                        format!("{}..{}", start, end)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            if folder.is_empty() {
                ranges
            } else {
                format!("{}: {}", folder, ranges)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(pairs: &[(&str, u64)]) -> Vec<ScriptIdentity> {
        pairs.iter().map(|(f, n)| ScriptIdentity::new(*f, *n)).collect()
    }

    #[test]
    fn test_empty() {
        let empty: Vec<ScriptIdentity> = Vec::new();
        assert_eq!(summarize_identities(&empty), "(none)");
    }

    #[test]
    fn test_ranges_per_folder() {
        let list = ids(&[("v1.0", 1), ("v1.0", 2), ("v1.0", 3), ("v1.0", 5), ("v2.0", 1)]);
        assert_eq!(summarize_identities(&list), "v1.0: 1..3, 5; v2.0: 1");
    }

    #[test]
    fn test_unscoped() {
        let list = ids(&[("", 1), ("", 2), ("", 4)]);
        assert_eq!(summarize_identities(&list), "1..2, 4");
    }
}
