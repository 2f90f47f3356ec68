//! Minimal INI reader.
//!
//! Sections become nested mappings keyed by section name. Option names are
//! lower-cased, values are kept as text, and a bare option with no
//! delimiter reads as null.

use crate::core::value::{Mapping, SecretValue};

/// Parse INI text. On failure returns the 1-based line and a reason.
pub fn parse(text: &str) -> Result<Mapping, (usize, String)> {
    let mut root = Mapping::new();
    let mut current: Option<(String, Mapping)> = None;

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest
                .strip_suffix(']')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .ok_or_else(|| (i + 1, format!("malformed section header {:?}", line)))?;
            if let Some((prev, entries)) = current.take() {
                merge_section(&mut root, prev, entries);
            }
            current = Some((name.to_string(), Mapping::new()));
            continue;
        }

        let (_, section) = current
            .as_mut()
            .ok_or_else(|| (i + 1, "option appears before any section header".to_string()))?;

        let split = line.find(['=', ':']);
        let (name, value) = match split {
            Some(at) => (
                line[..at].trim(),
                SecretValue::Text(line[at + 1..].trim().to_string()),
            ),
            None => (line, SecretValue::Null),
        };
        if name.is_empty() {
            return Err((i + 1, format!("option without a name {:?}", line)));
        }
        section.insert(name.to_lowercase(), value);
    }

    if let Some((name, entries)) = current {
        merge_section(&mut root, name, entries);
    }
    Ok(root)
}

// A repeated section adds to the earlier one.
fn merge_section(root: &mut Mapping, name: String, entries: Mapping) {
    let merged = match root.get(&name).cloned() {
        Some(SecretValue::Mapping(mut earlier)) => {
            for (k, v) in entries {
                earlier.insert(k, v);
            }
            earlier
        }
        _ => entries,
    };
    root.insert(name, SecretValue::Mapping(merged));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_become_mappings() {
        let parsed = parse("[database]\nHost = localhost\nport: 5432\n\n[api]\nkey=abc=def\n").unwrap();

        let db = parsed.get("database").and_then(SecretValue::as_mapping).unwrap();
        assert_eq!(db.get("host"), Some(&SecretValue::from("localhost")));
        assert_eq!(db.get("port"), Some(&SecretValue::from("5432")));

        let api = parsed.get("api").and_then(SecretValue::as_mapping).unwrap();
        assert_eq!(api.get("key"), Some(&SecretValue::from("abc=def")));
    }

    #[test]
    fn test_comments_and_bare_keys() {
        let parsed = parse("# header\n[s]\n; note\nflag\nempty =\n").unwrap();
        let s = parsed.get("s").and_then(SecretValue::as_mapping).unwrap();
        assert_eq!(s.get("flag"), Some(&SecretValue::Null));
        assert_eq!(s.get("empty"), Some(&SecretValue::from("")));
    }

    #[test]
    fn test_option_before_section_fails() {
        let (line, _) = parse("\nkey = value\n").unwrap_err();
        assert_eq!(line, 2);
    }

    #[test]
    fn test_bad_header_fails() {
        assert_eq!(parse("[open\n").unwrap_err().0, 1);
        assert_eq!(parse("[ ]\n").unwrap_err().0, 1);
    }

    #[test]
    fn test_repeated_section_merges() {
        let parsed = parse("[a]\nx = 1\n[b]\ny = 2\n[a]\nx = 3\nz = 4\n").unwrap();
        let a = parsed.get("a").and_then(SecretValue::as_mapping).unwrap();
        assert_eq!(a.get("x"), Some(&SecretValue::from("3")));
        assert_eq!(a.get("z"), Some(&SecretValue::from("4")));
        assert_eq!(parsed.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
