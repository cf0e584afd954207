//! Path-addressed scalar editing over JSON and YAML documents.
//!
//! The engine behind a structured-document field editor: project the node at
//! a path into flat editable rows, accept text edits to scalar fields, and
//! commit them back through a parse → resolve → merge → print cycle that
//! re-serializes in the document's original format. Only existing scalar
//! leaves are ever rewritten; structural edits are out of scope.
//!
//! # Example
//!
//! ```
//! use docedit_core::{EditSession, FormatTag};
//! use docedit_path::Step;
//!
//! let text = r#"{"customer": {"name": "Ann", "age": 30}}"#;
//! let mut session = EditSession::new(text, FormatTag::Json).unwrap();
//! session.select(vec![Step::Key("customer".to_string())]).unwrap();
//! assert_eq!(session.path_label(), r#"$["customer"]"#);
//!
//! session.begin_edit();
//! // Rows follow the map's key order: name, then age
//! session.update_field(1, "31").unwrap();
//! session.commit().unwrap();
//!
//! assert!(session.text().contains("\"age\": 31"));
//! ```

pub mod format;
pub mod project;
pub mod row;
pub mod session;

pub use format::{convert, parse, print, FormatError, FormatTag};
pub use project::{child_entries, merge_rows, node_kind, normalize, project, ChildEntry, NodeKind};
pub use row::{scalar_text, CoercionError, Row, ValueType};
pub use session::{CommitError, EditSession, SessionError};
