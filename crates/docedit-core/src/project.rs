//! Node projection: subtree to rows and back.
//!
//! [`project`] flattens the node at a path into editable rows, [`normalize`]
//! renders rows as display text, and [`merge_rows`] stages coerced values
//! for the write-back half of an edit cycle.

use crate::row::{CoercionError, Row};
use docedit_path::Step;
use serde_json::{Map, Value};

/// Project a subtree into its editable rows.
///
/// A scalar yields one keyless row; a map yields one keyed row per scalar
/// field, in the map's own key order, skipping container-valued entries;
/// a sequence yields no rows.
pub fn project(value: &Value) -> Vec<Row> {
    match value {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, v)| Row::from_value(Some(key.clone()), v))
            .collect(),
        Value::Array(_) => Vec::new(),
        scalar => Row::from_value(None, scalar).into_iter().collect(),
    }
}

/// Render rows as canonical display text.
///
/// No rows is `{}`, a single keyless row is its raw value text, and keyed
/// rows become a pretty-JSON object in row order. This is a display form,
/// always JSON regardless of the document's persisted format; a row whose
/// text no longer coerces under its declared type renders as a string.
pub fn normalize(rows: &[Row]) -> String {
    match rows {
        [] => "{}".to_string(),
        [row] if row.key.is_none() => row.value.clone(),
        rows => {
            let mut map = Map::new();
            for row in rows {
                let Some(key) = &row.key else { continue };
                let value = row
                    .coerce()
                    .unwrap_or_else(|_| Value::String(row.value.clone()));
                map.insert(key.clone(), value);
            }
            serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Coerce every keyed row into a staging map.
///
/// The first coercion failure aborts before anything touches the document,
/// which is what makes commit all-or-nothing.
pub fn merge_rows(rows: &[Row]) -> Result<Map<String, Value>, CoercionError> {
    let mut staged = Map::new();
    for row in rows {
        let Some(key) = &row.key else { continue };
        staged.insert(key.clone(), row.coerce()?);
    }
    Ok(staged)
}

/// The kind of a document node, as presented to a browsing host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
    Map,
    Sequence,
}

pub fn node_kind(value: &Value) -> NodeKind {
    match value {
        Value::Null => NodeKind::Null,
        Value::Bool(_) => NodeKind::Boolean,
        Value::Number(_) => NodeKind::Number,
        Value::String(_) => NodeKind::String,
        Value::Object(_) => NodeKind::Map,
        Value::Array(_) => NodeKind::Sequence,
    }
}

/// One direct child of a container node, for tree browsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// The step that descends to this child.
    pub step: Step,
    pub kind: NodeKind,
    /// Entry count for container children.
    pub len: Option<usize>,
}

/// List the direct children of a node, in container order.
///
/// Scalars have no children. Hosts append the returned steps to the current
/// path to drive node selection.
pub fn child_entries(value: &Value) -> Vec<ChildEntry> {
    fn entry(step: Step, v: &Value) -> ChildEntry {
        let len = match v {
            Value::Array(seq) => Some(seq.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        };
        ChildEntry {
            step,
            kind: node_kind(v),
            len,
        }
    }
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| entry(Step::Key(key.clone()), v))
            .collect(),
        Value::Array(seq) => seq
            .iter()
            .enumerate()
            .map(|(idx, v)| entry(Step::Index(idx), v))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::ValueType;
    use serde_json::json;

    #[test]
    fn test_project_scalar() {
        let rows = project(&json!(5));
        assert_eq!(
            rows,
            vec![Row {
                key: None,
                value: "5".to_string(),
                value_type: ValueType::Number,
            }]
        );
    }

    #[test]
    fn test_project_object_in_key_order() {
        let rows = project(&json!({"zeta": "z", "alpha": 1, "flag": false}));
        let keys: Vec<_> = rows.iter().filter_map(|r| r.key.as_deref()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "flag"]);
        assert_eq!(rows[2].value, "false");
        assert_eq!(rows[2].value_type, ValueType::Boolean);
    }

    #[test]
    fn test_project_skips_container_fields() {
        let rows = project(&json!({"name": "Ann", "tags": ["a"], "meta": {}}));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key.as_deref(), Some("name"));
    }

    #[test]
    fn test_project_sequence_is_empty() {
        assert!(project(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(&[]), "{}");
    }

    #[test]
    fn test_normalize_single_scalar() {
        let rows = vec![Row {
            key: None,
            value: "5".to_string(),
            value_type: ValueType::Number,
        }];
        assert_eq!(normalize(&rows), "5");

        // String scalars are raw text, not quoted
        let rows = project(&json!("hello"));
        assert_eq!(normalize(&rows), "hello");
    }

    #[test]
    fn test_normalize_object_preserves_order_and_types() {
        let rows = vec![
            Row {
                key: Some("a".to_string()),
                value: "1".to_string(),
                value_type: ValueType::Number,
            },
            Row {
                key: Some("b".to_string()),
                value: "x".to_string(),
                value_type: ValueType::String,
            },
        ];
        let text = normalize(&rows);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, json!({"a": 1, "b": "x"}));
        let a = text.find("\"a\"").unwrap();
        let b = text.find("\"b\"").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_merge_rows_stages_all_or_nothing() {
        let rows = vec![
            Row {
                key: Some("ok".to_string()),
                value: "1".to_string(),
                value_type: ValueType::Number,
            },
            Row {
                key: Some("bad".to_string()),
                value: "abc".to_string(),
                value_type: ValueType::Number,
            },
        ];
        assert!(merge_rows(&rows).is_err());

        let rows = project(&json!({"n": 1, "s": "x", "b": true, "z": null}));
        let staged = merge_rows(&rows).unwrap();
        assert_eq!(Value::Object(staged), json!({"n": 1, "s": "x", "b": true, "z": null}));
    }

    #[test]
    fn test_merge_rows_skips_keyless() {
        let rows = project(&json!(42));
        assert!(merge_rows(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_child_entries() {
        let entries = child_entries(&json!({"a": 1, "b": [1, 2], "c": {"x": 1}}));
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].step, Step::Key("a".to_string()));
        assert_eq!(entries[0].kind, NodeKind::Number);
        assert_eq!(entries[0].len, None);
        assert_eq!(entries[1].kind, NodeKind::Sequence);
        assert_eq!(entries[1].len, Some(2));
        assert_eq!(entries[2].kind, NodeKind::Map);
        assert_eq!(entries[2].len, Some(1));

        let entries = child_entries(&json!(["x", "y"]));
        assert_eq!(entries[1].step, Step::Index(1));
        assert_eq!(entries[1].kind, NodeKind::String);

        assert!(child_entries(&json!("scalar")).is_empty());
    }
}
