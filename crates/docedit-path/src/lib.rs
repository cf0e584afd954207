//! Typed path addressing over tree documents.
//!
//! A [`Path`] is an ordered list of [`Step`]s, each either a map key or a
//! sequence index. Resolution walks a `serde_json::Value` and checks the
//! container kind at every step, so an index applied to a map (or a key
//! applied to a sequence) is a structured [`PathError`] instead of a silent
//! miss.
//!
//! # Example
//!
//! ```
//! use docedit_path::{format_path, parse_path, resolve, set_at, Step};
//! use serde_json::json;
//!
//! let mut doc = json!({"customer": {"name": "Ann", "age": 30}});
//! let path = vec![Step::Key("customer".to_string()), Step::Key("age".to_string())];
//!
//! // Canonical locator string
//! assert_eq!(format_path(&path), r#"$["customer"]["age"]"#);
//! assert_eq!(parse_path(r#"$["customer"]["age"]"#).unwrap(), path);
//!
//! // Read and write through the path
//! assert_eq!(resolve(&doc, &path).unwrap(), &json!(30));
//! set_at(&mut doc, &path, json!(31)).unwrap();
//! assert_eq!(doc, json!({"customer": {"name": "Ann", "age": 31}}));
//! ```

use serde_json::Value;
use thiserror::Error;

pub mod types;
pub use types::{is_root, Path, Step};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("no value at {0}")]
    NotFound(String),
    #[error("sequence index out of bounds at {0}")]
    IndexOutOfBounds(String),
    #[error("{expected} step at {at} does not apply to {found}")]
    KindMismatch {
        at: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("malformed locator: {0}")]
    BadLocator(String),
}

/// Name the kind of a value the way locator errors report it.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "map",
    }
}

/// Resolve a path to the value it addresses.
///
/// The empty path resolves to the root itself.
///
/// # Errors
///
/// - [`PathError::NotFound`] if a map key is missing,
/// - [`PathError::IndexOutOfBounds`] if a sequence index is past the end,
/// - [`PathError::KindMismatch`] if a step does not match the container kind.
pub fn resolve<'a>(doc: &'a Value, path: &[Step]) -> Result<&'a Value, PathError> {
    let mut current = doc;
    for (depth, step) in path.iter().enumerate() {
        current = match (current, step) {
            (Value::Object(map), Step::Key(key)) => map
                .get(key)
                .ok_or_else(|| PathError::NotFound(format_path(&path[..=depth])))?,
            (Value::Array(seq), Step::Index(idx)) => seq
                .get(*idx)
                .ok_or_else(|| PathError::IndexOutOfBounds(format_path(&path[..=depth])))?,
            (other, step) => {
                return Err(PathError::KindMismatch {
                    at: format_path(&path[..depth]),
                    expected: step.container_kind(),
                    found: value_kind(other),
                })
            }
        };
    }
    Ok(current)
}

/// Resolve a path to a mutable reference to the value it addresses.
///
/// Same contract and errors as [`resolve`].
pub fn resolve_mut<'a>(doc: &'a mut Value, path: &[Step]) -> Result<&'a mut Value, PathError> {
    let mut current = doc;
    for (depth, step) in path.iter().enumerate() {
        current = match (current, step) {
            (Value::Object(map), Step::Key(key)) => map
                .get_mut(key)
                .ok_or_else(|| PathError::NotFound(format_path(&path[..=depth])))?,
            (Value::Array(seq), Step::Index(idx)) => seq
                .get_mut(*idx)
                .ok_or_else(|| PathError::IndexOutOfBounds(format_path(&path[..=depth])))?,
            (other, step) => {
                return Err(PathError::KindMismatch {
                    at: format_path(&path[..depth]),
                    expected: step.container_kind(),
                    found: value_kind(other),
                })
            }
        };
    }
    Ok(current)
}

/// Assign `value` at `path`: resolve the parent container, then set through
/// the final step.
///
/// All intermediate steps must resolve. The final step may name a map key
/// that does not exist yet (the entry is created); a final sequence index
/// must be in bounds. The empty path replaces the root, and a length-1 path
/// applies its step to the root directly.
///
/// # Example
///
/// ```
/// use docedit_path::{set_at, Step};
/// use serde_json::json;
///
/// let mut doc = json!({"a": 1});
/// set_at(&mut doc, &[Step::Key("b".to_string())], json!(true)).unwrap();
/// assert_eq!(doc, json!({"a": 1, "b": true}));
/// ```
pub fn set_at(doc: &mut Value, path: &[Step], value: Value) -> Result<(), PathError> {
    let Some((last, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    let parent = resolve_mut(doc, parent_path)?;
    match (parent, last) {
        (Value::Object(map), Step::Key(key)) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        (Value::Array(seq), Step::Index(idx)) => {
            let slot = seq
                .get_mut(*idx)
                .ok_or_else(|| PathError::IndexOutOfBounds(format_path(path)))?;
            *slot = value;
            Ok(())
        }
        (other, step) => Err(PathError::KindMismatch {
            at: format_path(parent_path),
            expected: step.container_kind(),
            found: value_kind(other),
        }),
    }
}

/// Render a path as its canonical locator string.
///
/// The root is `$`; each step appends a `[...]` segment, with map keys
/// JSON-quoted and sequence indices bare.
///
/// # Example
///
/// ```
/// use docedit_path::{format_path, Step};
///
/// assert_eq!(format_path(&[]), "$");
/// let path = vec![
///     Step::Key("a".to_string()),
///     Step::Index(2),
///     Step::Key("b".to_string()),
/// ];
/// assert_eq!(format_path(&path), r#"$["a"][2]["b"]"#);
/// ```
pub fn format_path(path: &[Step]) -> String {
    let mut out = String::from("$");
    for step in path {
        out.push('[');
        match step {
            Step::Key(key) => push_quoted(&mut out, key),
            Step::Index(idx) => out.push_str(&idx.to_string()),
        }
        out.push(']');
    }
    out
}

fn push_quoted(out: &mut String, key: &str) {
    out.push('"');
    for c in key.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Parse a locator string produced by [`format_path`] back into a path.
///
/// # Errors
///
/// [`PathError::BadLocator`] if the text deviates from the canonical form.
///
/// # Example
///
/// ```
/// use docedit_path::{parse_path, Step};
///
/// assert_eq!(parse_path("$").unwrap(), vec![]);
/// assert_eq!(
///     parse_path(r#"$["a"][2]"#).unwrap(),
///     vec![Step::Key("a".to_string()), Step::Index(2)],
/// );
/// ```
pub fn parse_path(locator: &str) -> Result<Path, PathError> {
    let rest = locator
        .strip_prefix('$')
        .ok_or_else(|| PathError::BadLocator("missing leading '$'".to_string()))?;
    let bytes = rest.as_bytes();
    let mut steps = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            return Err(PathError::BadLocator(format!(
                "expected '[' at offset {}",
                i + 1
            )));
        }
        i += 1;
        if bytes.get(i) == Some(&b'"') {
            i += 1;
            let mut key = String::new();
            loop {
                match bytes.get(i) {
                    None => {
                        return Err(PathError::BadLocator("unterminated key".to_string()));
                    }
                    Some(b'"') => {
                        i += 1;
                        break;
                    }
                    Some(b'\\') => match bytes.get(i + 1) {
                        Some(b'"') => {
                            key.push('"');
                            i += 2;
                        }
                        Some(b'\\') => {
                            key.push('\\');
                            i += 2;
                        }
                        _ => {
                            return Err(PathError::BadLocator("bad escape in key".to_string()));
                        }
                    },
                    Some(_) => {
                        // i always sits on a char boundary here
                        if let Some(c) = rest[i..].chars().next() {
                            key.push(c);
                            i += c.len_utf8();
                        }
                    }
                }
            }
            steps.push(Step::Key(key));
        } else {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i == start {
                return Err(PathError::BadLocator(format!(
                    "expected digit or '\"' at offset {}",
                    i + 1
                )));
            }
            let idx: usize = rest[start..i]
                .parse()
                .map_err(|_| PathError::BadLocator("index overflow".to_string()))?;
            steps.push(Step::Index(idx));
        }
        if bytes.get(i) != Some(&b']') {
            return Err(PathError::BadLocator(format!(
                "expected ']' at offset {}",
                i + 1
            )));
        }
        i += 1;
    }
    Ok(steps)
}
