//! Struct tag lookup (`key:"value" other:"value"`).

use regex::Regex;
use std::sync::OnceLock;

use crate::policy::COLUMN_TAG_KEY;

fn pair_re() -> &'static Regex {
    static PAIR_RE: OnceLock<Regex> = OnceLock::new();
    PAIR_RE.get_or_init(|| Regex::new(r#"([A-Za-z_][A-Za-z0-9_.-]*):"((?:[^"\\]|\\.)*)""#).unwrap())
}

/// Value stored under `key`, if the tag has one.
pub fn lookup<'a>(tag: &'a str, key: &str) -> Option<&'a str> {
    pair_re()
        .captures_iter(tag)
        .find(|caps| caps.get(1).is_some_and(|k| k.as_str() == key))
        .and_then(|caps| caps.get(2))
        .map(|v| v.as_str())
}

/// Persisted column name from the `db` key.
///
/// Options after a comma are dropped. `-` and empty values mean the field is
/// not persisted.
pub fn column(tag: &str) -> Option<&str> {
    let value = lookup(tag, COLUMN_TAG_KEY)?;
    let name = value.split(',').next().unwrap_or_default().trim();
    if name.is_empty() || name == "-" {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_single_key() {
        assert_eq!(column(r#"db:"account_id""#), Some("account_id"));
    }

    #[test]
    fn test_column_among_other_keys() {
        let tag = r#"json:"name,omitempty" db:"account_name" validate:"required""#;
        assert_eq!(column(tag), Some("account_name"));
        assert_eq!(lookup(tag, "json"), Some("name,omitempty"));
    }

    #[test]
    fn test_column_drops_options() {
        assert_eq!(column(r#"db:"account_name,omitempty""#), Some("account_name"));
    }

    #[test]
    fn test_column_absent_or_ignored() {
        assert_eq!(column(r#"json:"name""#), None);
        assert_eq!(column(r#"db:"-""#), None);
        assert_eq!(column(r#"db:"""#), None);
        assert_eq!(column(""), None);
    }
}
