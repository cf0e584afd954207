//! Read-edit-write sessions over a persisted document text.
//!
//! An [`EditSession`] owns one document's persisted text for the duration
//! of an edit cycle: it parses the text, projects the node at the selected
//! path into rows, accepts field edits, and on commit re-resolves the path,
//! applies the coerced rows, and re-serializes in the original format. The
//! write is all-or-nothing: any failure leaves the persisted text untouched.

use crate::format::{self, FormatError, FormatTag};
use crate::project::{merge_rows, normalize, project};
use crate::row::{CoercionError, Row};
use docedit_path::{format_path, resolve, resolve_mut, set_at, value_kind, Path, PathError};
use log::{debug, trace};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Viewing,
    Editing,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("row index {0} out of range")]
    IndexOutOfRange(usize),
    #[error("not in edit mode")]
    NotEditing,
}

/// Umbrella error for [`EditSession::commit`].
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("not in edit mode")]
    NotEditing,
    #[error("path resolution failed: {0}")]
    Path(#[from] PathError),
    #[error("row coercion failed: {0}")]
    Coerce(#[from] CoercionError),
    #[error("format conversion failed: {0}")]
    Format(#[from] FormatError),
}

/// One document's edit cycle: persisted text, the parsed document, the
/// selected target path, and the projected rows under edit.
pub struct EditSession {
    text: String,
    format: FormatTag,
    document: Value,
    target: Path,
    rows: Vec<Row>,
    mode: Mode,
}

impl EditSession {
    /// Open a session on persisted text, selecting the document root.
    pub fn new(text: impl Into<String>, format: FormatTag) -> Result<EditSession, FormatError> {
        let text = text.into();
        let document = format::parse(&text, format)?;
        let rows = project(&document);
        Ok(EditSession {
            text,
            format,
            document,
            target: Vec::new(),
            rows,
            mode: Mode::Viewing,
        })
    }

    /// Select the node at `target`, discarding any in-progress edits and
    /// re-projecting rows.
    pub fn select(&mut self, target: Path) -> Result<(), PathError> {
        let node = resolve(&self.document, &target)?;
        self.rows = project(node);
        self.target = target;
        self.mode = Mode::Viewing;
        debug!("selected {}", format_path(&self.target));
        Ok(())
    }

    /// The current row projection.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The persisted document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> FormatTag {
        self.format
    }

    /// The selected path as its canonical locator string.
    pub fn path_label(&self) -> String {
        format_path(&self.target)
    }

    /// The current rows as canonical display text.
    pub fn normalized(&self) -> String {
        normalize(&self.rows)
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// Enter edit mode. No data change; idempotent while editing.
    pub fn begin_edit(&mut self) {
        self.mode = Mode::Editing;
    }

    /// Replace the text of one row.
    pub fn update_field(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.mode != Mode::Editing {
            return Err(SessionError::NotEditing);
        }
        let row = self
            .rows
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange(index))?;
        row.value = text.into();
        Ok(())
    }

    /// Leave edit mode, discarding all field edits since [`Self::begin_edit`].
    pub fn cancel(&mut self) {
        if self.mode != Mode::Editing {
            return;
        }
        self.rows = self.project_target();
        self.mode = Mode::Viewing;
    }

    /// Commit the edited rows: parse the persisted text, apply the coerced
    /// rows at the target path, re-serialize in the session's format, and
    /// replace the persisted text.
    ///
    /// All rows are coerced before the document is touched, so a failure at
    /// any point leaves the persisted text exactly as it was. The unique
    /// borrow serializes commits within a thread; a multi-threaded host must
    /// hold its own lock across the whole call.
    pub fn commit(&mut self) -> Result<(), CommitError> {
        if self.mode != Mode::Editing {
            return Err(CommitError::NotEditing);
        }
        let staged = merge_rows(&self.rows)?;
        let scalar = match self.rows.as_slice() {
            [row] if row.key.is_none() => Some(row.coerce()?),
            _ => None,
        };
        let staged_len = staged.len();

        let mut document = format::parse(&self.text, self.format)?;
        if let Some(value) = scalar {
            set_at(&mut document, &self.target, value)?;
        } else if !staged.is_empty() {
            match resolve_mut(&mut document, &self.target)? {
                Value::Object(map) => {
                    for (key, value) in staged {
                        map.insert(key, value);
                    }
                }
                other => {
                    return Err(PathError::KindMismatch {
                        at: format_path(&self.target),
                        expected: "map",
                        found: value_kind(other),
                    }
                    .into());
                }
            }
        }
        // A node with no editable rows commits as a no-op.

        let text = format::print(&document, self.format)?;
        self.text = text;
        self.document = document;
        self.rows = self.project_target();
        self.mode = Mode::Viewing;
        trace!(
            "committed {staged_len} field(s) at {}",
            format_path(&self.target)
        );
        Ok(())
    }

    fn project_target(&self) -> Vec<Row> {
        // The target was validated on select and the document only changes
        // through commit, so resolution here cannot fail in practice.
        resolve(&self.document, &self.target)
            .map(project)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docedit_path::Step;
    use serde_json::json;

    fn key(k: &str) -> Step {
        Step::Key(k.to_string())
    }

    fn session(doc: Value) -> EditSession {
        let text = serde_json::to_string_pretty(&doc).unwrap();
        EditSession::new(text, FormatTag::Json).unwrap()
    }

    #[test]
    fn test_new_selects_root() {
        let s = session(json!({"a": 1, "b": {"c": 2}}));
        assert_eq!(s.path_label(), "$");
        // b is a container, so only a projects
        assert_eq!(s.rows().len(), 1);
        assert_eq!(s.rows()[0].key.as_deref(), Some("a"));
        assert!(!s.is_editing());
    }

    #[test]
    fn test_select_rejects_bad_path() {
        let mut s = session(json!({"a": 1}));
        let err = s.select(vec![key("missing")]).unwrap_err();
        assert!(matches!(err, PathError::NotFound(_)));
        // Selection unchanged
        assert_eq!(s.path_label(), "$");
    }

    #[test]
    fn test_update_field_requires_edit_mode() {
        let mut s = session(json!({"a": 1}));
        assert_eq!(
            s.update_field(0, "2").unwrap_err(),
            SessionError::NotEditing
        );
    }

    #[test]
    fn test_update_field_out_of_range() {
        let mut s = session(json!({"a": 1}));
        let before = s.text().to_string();
        s.begin_edit();
        assert_eq!(
            s.update_field(5, "2").unwrap_err(),
            SessionError::IndexOutOfRange(5)
        );
        assert_eq!(s.text(), before);
    }

    #[test]
    fn test_cancel_restores_projection() {
        let mut s = session(json!({"a": 1, "b": "x"}));
        let fresh = s.rows().to_vec();
        s.begin_edit();
        s.update_field(0, "999").unwrap();
        s.update_field(1, "changed").unwrap();
        s.cancel();
        assert_eq!(s.rows(), fresh.as_slice());
        assert!(!s.is_editing());
    }

    #[test]
    fn test_commit_requires_edit_mode() {
        let mut s = session(json!({"a": 1}));
        assert!(matches!(s.commit(), Err(CommitError::NotEditing)));
    }

    #[test]
    fn test_commit_object_node() {
        let mut s = session(json!({"customer": {"name": "Ann", "age": 30}}));
        s.select(vec![key("customer")]).unwrap();
        s.begin_edit();
        // rows: name, age
        s.update_field(1, "31").unwrap();
        s.commit().unwrap();
        assert!(!s.is_editing());

        let doc: Value = serde_json::from_str(s.text()).unwrap();
        assert_eq!(doc, json!({"customer": {"name": "Ann", "age": 31}}));
        // Numeric type preserved, not stringified
        assert_eq!(doc["customer"]["age"], json!(31));
    }

    #[test]
    fn test_commit_scalar_node() {
        let mut s = session(json!({"level": "info"}));
        s.select(vec![key("level")]).unwrap();
        assert_eq!(s.rows().len(), 1);
        assert!(s.rows()[0].key.is_none());
        s.begin_edit();
        s.update_field(0, "debug").unwrap();
        s.commit().unwrap();

        let doc: Value = serde_json::from_str(s.text()).unwrap();
        assert_eq!(doc, json!({"level": "debug"}));
    }

    #[test]
    fn test_commit_scalar_root() {
        let mut s = EditSession::new("5", FormatTag::Json).unwrap();
        s.begin_edit();
        s.update_field(0, "6").unwrap();
        s.commit().unwrap();
        assert_eq!(s.text(), "6");
    }

    #[test]
    fn test_commit_coercion_failure_is_atomic() {
        let mut s = session(json!({"count": 3}));
        let before = s.text().to_string();
        s.begin_edit();
        s.update_field(0, "abc").unwrap();
        let err = s.commit().unwrap_err();
        assert!(matches!(err, CommitError::Coerce(_)));
        assert_eq!(s.text(), before);
        // Still editing, so the bad text can be fixed
        assert!(s.is_editing());
        assert_eq!(s.rows()[0].value, "abc");
    }

    #[test]
    fn test_commit_no_editable_rows_is_noop() {
        // Every field is a container: projection is empty, commit succeeds
        let mut s = session(json!({"nested": {"a": 1}, "list": [1]}));
        s.begin_edit();
        assert!(s.rows().is_empty());
        s.commit().unwrap();
        let doc: Value = serde_json::from_str(s.text()).unwrap();
        assert_eq!(doc, json!({"nested": {"a": 1}, "list": [1]}));
    }

    #[test]
    fn test_commit_reprojects_rows() {
        let mut s = session(json!({"n": 1}));
        s.begin_edit();
        s.update_field(0, "2").unwrap();
        s.commit().unwrap();
        assert_eq!(s.rows()[0].value, "2");
        assert_eq!(s.normalized(), "{\n  \"n\": 2\n}");
    }

    #[test]
    fn test_unchanged_commit_round_trips() {
        // project then merge with untouched rows reproduces the document
        let text = serde_json::to_string_pretty(
            &json!({"s": "x", "n": 1.5, "b": false, "z": null}),
        )
        .unwrap();
        let mut s = EditSession::new(text.clone(), FormatTag::Json).unwrap();
        s.begin_edit();
        s.commit().unwrap();
        assert_eq!(s.text(), text);
    }
}
