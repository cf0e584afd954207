//! Path step types.

/// A single step in a document path.
///
/// Steps are tagged: a [`Step::Key`] only descends into maps and a
/// [`Step::Index`] only descends into sequences. Resolution checks the
/// container kind at every step instead of duck-typing the segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// A map key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// A path into a document. The empty path addresses the root.
pub type Path = Vec<Step>;

impl Step {
    /// The container kind this step can descend into.
    pub fn container_kind(&self) -> &'static str {
        match self {
            Step::Key(_) => "map",
            Step::Index(_) => "sequence",
        }
    }

    /// The map key, if this is a key step.
    pub fn key(&self) -> Option<&str> {
        match self {
            Step::Key(key) => Some(key),
            Step::Index(_) => None,
        }
    }

    /// The sequence index, if this is an index step.
    pub fn index(&self) -> Option<usize> {
        match self {
            Step::Key(_) => None,
            Step::Index(idx) => Some(*idx),
        }
    }
}

impl From<&str> for Step {
    fn from(key: &str) -> Self {
        Step::Key(key.to_string())
    }
}

impl From<String> for Step {
    fn from(key: String) -> Self {
        Step::Key(key)
    }
}

impl From<usize> for Step {
    fn from(idx: usize) -> Self {
        Step::Index(idx)
    }
}

/// Check if a path addresses the document root.
///
/// # Example
///
/// ```
/// use docedit_path::{is_root, Step};
///
/// assert!(is_root(&[]));
/// assert!(!is_root(&[Step::Key("foo".to_string())]));
/// ```
pub fn is_root(path: &[Step]) -> bool {
    path.is_empty()
}
