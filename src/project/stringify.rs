//! Rendering composite JSON values as single CSV cells

use crate::project::projector::Row;
use serde_json::Value;

/// Separators used when flattening arrays and objects to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringifyConfig {
    /// Between array elements
    pub list_separator: String,

    /// Between an object key and its value
    pub kv_separator: String,

    /// Between object entries
    pub entry_separator: String,

    /// Written before an object's entries
    pub open: String,

    /// Written after an object's entries
    pub close: String,

    /// Text for null, both nested and as a whole cell
    pub null_text: String,
}

impl Default for StringifyConfig {
    fn default() -> Self {
        StringifyConfig {
            list_separator: String::from(", "),
            kv_separator: String::from(": "),
            entry_separator: String::from("\n"),
            open: String::new(),
            close: String::new(),
            null_text: String::new(),
        }
    }
}

/// Render any JSON value as text
///
/// Strings are written without quotes, numbers and booleans in their JSON form.
pub fn stringify(value: &Value, config: &StringifyConfig) -> String {
    let mut out = String::new();
    write_value(value, config, &mut out);
    out
}

fn write_value(value: &Value, config: &StringifyConfig, out: &mut String) {
    match value {
        Value::Null => out.push_str(&config.null_text),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(&config.list_separator);
                }
                write_value(item, config, out);
            }
        }
        Value::Object(obj) => {
            out.push_str(&config.open);
            for (idx, (key, item)) in obj.iter().enumerate() {
                if idx > 0 {
                    out.push_str(&config.entry_separator);
                }
                out.push_str(key);
                out.push_str(&config.kv_separator);
                write_value(item, config, out);
            }
            out.push_str(&config.close);
        }
    }
}

/// Replace every composite and null cell of a row with its rendered text
///
/// Null and missing cells become `null_text`. Strings, numbers and booleans pass
/// through unchanged.
pub fn stringify_row(row: Row, config: &StringifyConfig) -> Row {
    row.into_iter()
        .map(|(header, value)| match value {
            Value::Array(_) | Value::Object(_) => {
                let text = stringify(&value, config);
                (header, Value::String(text))
            }
            Value::Null => (header, Value::String(config.null_text.clone())),
            scalar => (header, scalar),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars() {
        let config = StringifyConfig::default();
        assert_eq!(stringify(&json!("text"), &config), "text");
        assert_eq!(stringify(&json!(42), &config), "42");
        assert_eq!(stringify(&json!(1.5), &config), "1.5");
        assert_eq!(stringify(&json!(true), &config), "true");
        assert_eq!(stringify(&Value::Null, &config), "");
    }

    #[test]
    fn test_list_uses_list_separator() {
        let config = StringifyConfig::default();
        assert_eq!(stringify(&json!(["a", 1, null, false]), &config), "a, 1, , false");
    }

    #[test]
    fn test_object_default_layout() {
        let config = StringifyConfig::default();
        let value = json!({"name": "Alice", "tags": ["x", "y"]});
        assert_eq!(stringify(&value, &config), "name: Alice\ntags: x, y");
    }

    #[test]
    fn test_custom_separators_and_brackets() {
        let config = StringifyConfig {
            list_separator: String::from("|"),
            kv_separator: String::from("="),
            entry_separator: String::from(";"),
            open: String::from("{"),
            close: String::from("}"),
            null_text: String::from("NULL"),
        };
        let value = json!([{"a": 1, "b": null}, {"c": [2, 3]}]);
        assert_eq!(stringify(&value, &config), "{a=1;b=NULL}|{c=2|3}");
    }

    #[test]
    fn test_stringify_row_keeps_scalars() {
        let mut row = Row::new();
        row.insert("id".to_string(), json!(7));
        row.insert("tags".to_string(), json!(["a", "b"]));
        row.insert("missing".to_string(), Value::Null);

        let row = stringify_row(row, &StringifyConfig::default());

        assert_eq!(row["id"], json!(7));
        assert_eq!(row["tags"], json!("a, b"));
        assert_eq!(row["missing"], json!(""));
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["id", "tags", "missing"]);
    }

    #[test]
    fn test_stringify_row_null_cells_use_null_text() {
        let config = StringifyConfig {
            null_text: String::from("NULL"),
            ..StringifyConfig::default()
        };
        let mut row = Row::new();
        row.insert("missing".to_string(), Value::Null);
        row.insert("nested".to_string(), json!([1, null]));

        let row = stringify_row(row, &config);

        assert_eq!(row["missing"], json!("NULL"));
        assert_eq!(row["nested"], json!("1, NULL"));
    }
}
