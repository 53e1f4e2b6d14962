//! Tag lists at the backend boundary.
//!
//! Cortex stores tags as the stringified form of a list (`"['a', 'b']"`) and
//! returns them that way from `/graph`, while `/analyze` returns a proper JSON
//! array. [`Tags`] accepts both and always serializes as an array.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Ordered, de-duplicated list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Creates a tag list, normalizing each entry.
    #[must_use]
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for tag in tags {
            push_unique(&mut out, tag.as_ref());
        }
        Self(out)
    }

    /// Parses the legacy stringified-list encoding.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(parse_tag_string(raw))
    }

    /// Returns the tags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the tags.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsRepr {
    List(Vec<String>),
    Legacy(String),
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = Option::<TagsRepr>::deserialize(deserializer)?;
        Ok(match repr {
            Some(TagsRepr::List(list)) => Self::new(list),
            Some(TagsRepr::Legacy(raw)) => Self::parse(&raw),
            None => Self::default(),
        })
    }
}

/// Parses a bracket/quote-wrapped, comma-separated tag string.
///
/// `"['a', 'b']"` yields `["a", "b"]`. Whitespace is trimmed, empty tokens
/// are dropped and repeated tags keep their first position.
#[must_use]
pub fn parse_tag_string(raw: &str) -> Vec<String> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '\'' | '"'))
        .collect();

    let mut out = Vec::new();
    for token in stripped.split(',') {
        push_unique(&mut out, token);
    }
    out
}

fn push_unique(out: &mut Vec<String>, token: &str) {
    let token = token.trim();
    if token.is_empty() || out.iter().any(|t| t == token) {
        return;
    }
    out.push(token.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("['a', 'b']", &["a", "b"]; "python list repr")]
    #[test_case("[\"rust\", \"async\"]", &["rust", "async"]; "double quoted")]
    #[test_case("a,b , c", &["a", "b", "c"]; "bare csv")]
    #[test_case("['a', '', ' ', 'b']", &["a", "b"]; "empty tokens dropped")]
    #[test_case("['a', 'a', 'b']", &["a", "b"]; "duplicates collapse")]
    #[test_case("[]", &[]; "empty list")]
    #[test_case("", &[]; "empty string")]
    fn test_parse_tag_string(raw: &str, expected: &[&str]) {
        assert_eq!(parse_tag_string(raw), expected);
    }

    #[test]
    fn test_deserialize_accepts_list_and_legacy() {
        let list: Tags = serde_json::from_str(r#"["x", " y "]"#).unwrap();
        let legacy: Tags = serde_json::from_str(r#""['x', 'y']""#).unwrap();
        let null: Tags = serde_json::from_str("null").unwrap();

        assert_eq!(list, legacy);
        assert_eq!(list.as_slice(), ["x", "y"]);
        assert!(null.is_empty());
    }

    #[test]
    fn test_serializes_as_array() {
        let tags = Tags::parse("['ops', 'oncall']");
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["ops","oncall"]"#);
        assert_eq!(tags.to_string(), "ops, oncall");
    }
}
