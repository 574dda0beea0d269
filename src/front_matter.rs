//! Front matter extraction.
//!
//! A text file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! tags: [intro, meta]
//! ---
//! Body text starts here.
//! ```
//!
//! The content is trimmed before looking for the opening fence. A file that
//! does not open with `---`, or whose block is never closed, has no front
//! matter and its whole (trimmed) text is the body. An empty block yields an
//! empty [`FrontMatter`], which callers treat the same as no block at all.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("front matter must be a key/value mapping")]
    NotAMapping,
}

const FENCE: &str = "---";

/// Metadata parsed from a front-matter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// A scalar field rendered as a string. Blank strings count as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string).filter(|s| !s.trim().is_empty())
    }

    /// A boolean field; non-boolean values are ignored.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// A list field in document order. A lone scalar becomes a one-item list.
    pub fn list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(other) => scalar_to_string(other).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Split raw file text into front matter and body.
///
/// Returns an empty [`FrontMatter`] and the trimmed text when there is no
/// block. Fails only when a block is present but is not a YAML mapping.
pub fn extract(raw: &str) -> Result<(FrontMatter, String), FrontMatterError> {
    let text = raw.trim();
    let Some((yaml, body)) = split_block(text) else {
        return Ok((FrontMatter::default(), text.to_string()));
    };

    let fields = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(m) => m,
        Value::Null => Mapping::new(),
        _ => return Err(FrontMatterError::NotAMapping),
    };

    Ok((FrontMatter { fields }, body.trim().to_string()))
}

/// Locate the fenced block, returning `(yaml, rest)`.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != FENCE {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == FENCE {
            return Some((&text[yaml_start..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fields_and_body() {
        let raw = "---\ntitle: A\ndate: 2024-01-01\n---\nhello world\n";
        let (fm, body) = extract(raw).unwrap();
        assert_eq!(fm.text("title").as_deref(), Some("A"));
        assert_eq!(fm.text("date").as_deref(), Some("2024-01-01"));
        assert_eq!(body, "hello world");
    }

    #[test]
    fn no_block_returns_trimmed_text() {
        let (fm, body) = extract("\n\n# Heading\n\ntext  \n").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "# Heading\n\ntext");
    }

    #[test]
    fn leading_whitespace_before_fence_is_tolerated() {
        let (fm, body) = extract("  \n---\ntitle: X\n---\nbody").unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(body, "body");
    }

    #[test]
    fn crlf_line_endings() {
        let (fm, body) = extract("---\r\ntitle: X\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(fm.text("title").as_deref(), Some("X"));
        assert_eq!(body, "body");
    }

    #[test]
    fn empty_block_is_empty_front_matter() {
        let (fm, body) = extract("---\n---\nbody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn unclosed_block_is_not_front_matter() {
        let raw = "---\ntitle: X\nbody without closing fence";
        let (fm, body) = extract(raw).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, raw);
    }

    #[test]
    fn horizontal_rule_later_in_body_is_kept() {
        let (_, body) = extract("---\na: 1\n---\nabove\n---\nbelow").unwrap();
        assert_eq!(body, "above\n---\nbelow");
    }

    #[test]
    fn scalar_block_is_error() {
        assert!(matches!(
            extract("---\njust a string\n---\nbody"),
            Err(FrontMatterError::NotAMapping)
        ));
    }

    #[test]
    fn malformed_yaml_is_error() {
        assert!(matches!(
            extract("---\ntitle: [unclosed\n---\nbody"),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn list_accepts_sequence_or_scalar() {
        let (fm, _) = extract("---\ntags: [b, a, 3]\nalias: /old\n---\n").unwrap();
        assert_eq!(fm.list("tags"), vec!["b", "a", "3"]);
        assert_eq!(fm.list("alias"), vec!["/old"]);
        assert!(fm.list("missing").is_empty());
    }

    #[test]
    fn blank_text_counts_as_absent() {
        let (fm, _) = extract("---\ntitle: '  '\npublished: false\n---\n").unwrap();
        assert_eq!(fm.text("title"), None);
        assert_eq!(fm.flag("published"), Some(false));
    }
}
