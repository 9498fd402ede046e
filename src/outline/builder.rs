//! Outline inference with a streaming accumulator
//!
//! Records are folded into a sorted set of leaf paths one at a time, so a generator fed
//! from a line-delimited stream never has to hold more than one record. The outline is
//! rendered once at the end.

use crate::outline::types::{Outline, OutlineEntry};
use crate::path::DottedPath;
use serde_json::Value;
use std::collections::BTreeSet;

/// Every distinct path from `value` to a leaf
///
/// Scalars (including null) are leaves. Containers are never emitted themselves, and an
/// empty object or array contributes nothing.
pub fn enumerate_paths(value: &Value) -> BTreeSet<DottedPath> {
    let mut paths = BTreeSet::new();
    collect_paths(value, DottedPath::root(), &mut paths);
    paths
}

fn collect_paths(value: &Value, prefix: DottedPath, paths: &mut BTreeSet<DottedPath>) {
    match value {
        Value::Object(obj) => {
            for (key, child) in obj.iter() {
                collect_paths(child, prefix.child(key.as_str()), paths);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                collect_paths(child, prefix.child(idx), paths);
            }
        }
        _ => {
            paths.insert(prefix);
        }
    }
}

/// Accumulates the union of leaf paths across records
#[derive(Debug, Default)]
pub struct OutlineBuilder {
    paths: BTreeSet<DottedPath>,
    record_count: usize,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        OutlineBuilder::default()
    }

    /// Fold one record into the path set
    pub fn add_value(&mut self, value: &Value) {
        collect_paths(value, DottedPath::root(), &mut self.paths);
        self.record_count += 1;
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Render the accumulated paths as an outline
    ///
    /// Paths are already in segment order, with indices compared as integers; they are
    /// only turned into text here.
    pub fn build(self, collection: Option<String>) -> Outline {
        let map = self
            .paths
            .iter()
            .map(|path| OutlineEntry::new(path.header(), path.to_string()))
            .collect();

        Outline::new(map, collection)
    }
}

/// Derive an outline from a batch of records
pub fn build_outline<'a, I>(records: I, collection: Option<&str>) -> Outline
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut builder = OutlineBuilder::new();
    for record in records {
        builder.add_value(record);
    }
    builder.build(collection.map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths_of(outline: &Outline) -> Vec<&str> {
        outline.map.iter().map(OutlineEntry::path).collect()
    }

    #[test]
    fn test_enumerate_leaf_paths_only() {
        let value = json!({"a": {"b": 1, "c": [true, null]}, "d": "x"});
        let paths: Vec<String> = enumerate_paths(&value)
            .iter()
            .map(|p| p.to_string())
            .collect();

        assert_eq!(paths, vec!["a.b", "a.c.0", "a.c.1", "d"]);
    }

    #[test]
    fn test_empty_containers_contribute_nothing() {
        let value = json!({"empty_obj": {}, "empty_list": [], "x": 1});
        let paths = enumerate_paths(&value);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths.iter().next().unwrap().to_string(), "x");
    }

    #[test]
    fn test_deep_nesting() {
        let records = vec![json!({"one": [{"two": [{"three": [1, 2, 3]}]}]})];
        let outline = build_outline(&records, None);

        assert_eq!(
            outline.map,
            vec![
                OutlineEntry::new("one_0_two_0_three_0", "one.0.two.0.three.0"),
                OutlineEntry::new("one_0_two_0_three_1", "one.0.two.0.three.1"),
                OutlineEntry::new("one_0_two_0_three_2", "one.0.two.0.three.2"),
            ]
        );
    }

    #[test]
    fn test_union_across_records() {
        let records = vec![
            json!({"_id": "Someone", "count": 1}),
            json!({"_id": "Another", "extra": {"flag": false}}),
            json!({"_id": "Third"}),
        ];
        let outline = build_outline(&records, None);

        assert_eq!(paths_of(&outline), vec!["_id", "count", "extra.flag"]);
    }

    #[test]
    fn test_indices_sort_numerically() {
        let tags: Vec<Value> = (0..12).map(|i| json!(i)).collect();
        let records = vec![json!({ "tags": tags })];
        let outline = build_outline(&records, None);

        let paths = paths_of(&outline);
        let pos_2 = paths.iter().position(|p| *p == "tags.2").unwrap();
        let pos_10 = paths.iter().position(|p| *p == "tags.10").unwrap();
        assert!(pos_2 < pos_10);
        assert_eq!(paths.last(), Some(&"tags.11"));
    }

    #[test]
    fn test_case_is_preserved_in_headers() {
        let records = vec![json!({"Author": {"FullName": "Someone"}})];
        let outline = build_outline(&records, None);

        assert_eq!(outline.map[0], OutlineEntry::new("Author_FullName", "Author.FullName"));
    }

    #[test]
    fn test_empty_records_yield_empty_map() {
        let records: Vec<Value> = Vec::new();
        let outline = build_outline(&records, Some("result"));

        assert!(outline.is_empty());
        assert_eq!(outline.collection.as_deref(), Some("result"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let records = vec![
            json!({"z": 1, "a": [3, {"k": "v"}], "m": null}),
            json!({"b": {"10": 1, "9": 2}}),
        ];

        let first = build_outline(&records, None);
        let second = build_outline(records.iter().rev(), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_builder_counts() {
        let mut builder = OutlineBuilder::new();
        builder.add_value(&json!({"a": 1}));
        builder.add_value(&json!({"a": 2, "b": 3}));

        assert_eq!(builder.record_count(), 2);
        assert_eq!(builder.path_count(), 2);
    }
}
