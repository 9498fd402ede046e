//! Dotted-path addressing into nested JSON
//!
//! A path is a sequence of typed segments. Paths discovered by walking a value keep the
//! object/array origin of every segment, so they never need to round-trip through text.
//! Paths read from a hand-authored outline go through [`DottedPath::parse`], where an
//! all-digit segment is taken to be an array index.

use serde_json::Value;
use std::fmt;

/// One step into a JSON value
///
/// Indices order before keys, and indices compare numerically, so a sorted set of paths
/// lists `tags.2` before `tags.10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Position in an array
    Index(usize),
    /// Field name in an object
    Key(String),
}

impl Segment {
    /// Parse a single serialized segment
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(idx) = raw.parse::<usize>() {
                return Segment::Index(idx);
            }
        }
        Segment::Key(raw.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(idx) => write!(f, "{}", idx),
            Segment::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<usize> for Segment {
    fn from(idx: usize) -> Self {
        Segment::Index(idx)
    }
}

/// An address into a JSON value, resolved strictly left to right
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DottedPath {
    segments: Vec<Segment>,
}

impl DottedPath {
    /// The empty path, addressing the value itself
    pub fn root() -> Self {
        DottedPath::default()
    }

    /// Parse a `.`-joined path
    ///
    /// Lossy for object keys made only of digits: `"a.0"` always addresses index 0.
    pub fn parse(serialized: &str) -> Self {
        DottedPath {
            segments: serialized.split('.').map(Segment::parse).collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new path one segment deeper
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment.into());
        DottedPath { segments }
    }

    /// Join segments with an arbitrary separator
    pub fn join(&self, separator: &str) -> String {
        self.segments
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Column header derived from the path: segments joined with `_`, case preserved
    pub fn header(&self) -> String {
        self.join("_")
    }

    /// Walk the path through `value`
    ///
    /// Returns `None` when a key is missing, an index is out of range, or a segment
    /// meets a value of the wrong shape. Never panics.
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match (segment, current) {
                (Segment::Key(key), Value::Object(obj)) => obj.get(key),
                (Segment::Index(idx), Value::Array(items)) => items.get(*idx),
                _ => None,
            })
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join("."))
    }
}

impl From<Vec<Segment>> for DottedPath {
    fn from(segments: Vec<Segment>) -> Self {
        DottedPath { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_mixed_segments() {
        let path = DottedPath::parse("one.0.two.12.three");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("one".into()),
                Segment::Index(0),
                Segment::Key("two".into()),
                Segment::Index(12),
                Segment::Key("three".into()),
            ]
        );
        assert_eq!(path.to_string(), "one.0.two.12.three");
    }

    #[test]
    fn test_parse_keeps_non_digit_segments_as_keys() {
        let path = DottedPath::parse("_id.-1.1a");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("_id".into()),
                Segment::Key("-1".into()),
                Segment::Key("1a".into()),
            ]
        );
    }

    #[test]
    fn test_resolve_nested() {
        let data = json!({"source": {"author": "Someone"}, "tags": ["a", "b"]});

        assert_eq!(
            DottedPath::parse("source.author").resolve(&data),
            Some(&json!("Someone"))
        );
        assert_eq!(DottedPath::parse("tags.1").resolve(&data), Some(&json!("b")));
    }

    #[test]
    fn test_resolve_misses_are_absent() {
        let data = json!({"source": {"author": "Someone"}, "tags": ["a", "b"], "n": 3});

        // missing key
        assert_eq!(DottedPath::parse("source.title").resolve(&data), None);
        // index out of range
        assert_eq!(DottedPath::parse("tags.5").resolve(&data), None);
        // keying into an array
        assert_eq!(DottedPath::parse("tags.first").resolve(&data), None);
        // indexing into an object
        assert_eq!(DottedPath::parse("source.0").resolve(&data), None);
        // descending through a scalar
        assert_eq!(DottedPath::parse("n.value").resolve(&data), None);
    }

    #[test]
    fn test_resolve_present_null_is_not_absent() {
        let data = json!({"gone": null});
        assert_eq!(DottedPath::parse("gone").resolve(&data), Some(&Value::Null));
    }

    #[test]
    fn test_digit_object_key_is_ambiguous_after_parse() {
        let data = json!({"codes": {"0": "zero"}});
        let typed = DottedPath::root().child("codes").child("0");

        assert_eq!(typed.resolve(&data), Some(&json!("zero")));
        assert_eq!(DottedPath::parse(&typed.to_string()).resolve(&data), None);
    }

    #[test]
    fn test_segment_ordering_is_numeric() {
        let two = DottedPath::root().child("tags").child(2usize);
        let ten = DottedPath::root().child("tags").child(10usize);
        assert!(two < ten);
        assert!(Segment::Index(99) < Segment::Key("0".into()));
    }

    #[test]
    fn test_header_preserves_case() {
        let path = DottedPath::parse("Author.Name.0");
        assert_eq!(path.header(), "Author_Name_0");
    }
}
