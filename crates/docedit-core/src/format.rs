//! Document text converters.
//!
//! A document travels as text in one of the supported serialization formats
//! and lives in memory as a `serde_json::Value` (with `preserve_order`, so
//! map key order is the document's own order). [`parse`] and [`print`] are
//! the two ends of the round-trip contract; [`convert`] chains them.

use serde_json::Value;
use thiserror::Error;

/// The serialization format of a document's persisted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Json,
    Yaml,
}

impl FormatTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatTag::Json => "json",
            FormatTag::Yaml => "yaml",
        }
    }

    /// Map a file extension to a format tag.
    pub fn from_extension(ext: &str) -> Option<FormatTag> {
        match ext {
            "json" => Some(FormatTag::Json),
            "yaml" | "yml" => Some(FormatTag::Yaml),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed {tag} input: {message}")]
    Parse { tag: &'static str, message: String },
    #[error("value not representable as {tag}: {message}")]
    Print { tag: &'static str, message: String },
}

/// Parse document text into an in-memory document.
///
/// # Errors
///
/// [`FormatError::Parse`] on malformed input, including YAML documents whose
/// structure has no JSON counterpart (e.g. non-string map keys).
pub fn parse(text: &str, tag: FormatTag) -> Result<Value, FormatError> {
    match tag {
        FormatTag::Json => serde_json::from_str(text).map_err(|e| FormatError::Parse {
            tag: tag.as_str(),
            message: e.to_string(),
        }),
        FormatTag::Yaml => serde_yaml::from_str(text).map_err(|e| FormatError::Parse {
            tag: tag.as_str(),
            message: e.to_string(),
        }),
    }
}

/// Serialize an in-memory document back to text.
///
/// JSON is printed pretty, YAML in block style. Map key order is preserved.
pub fn print(doc: &Value, tag: FormatTag) -> Result<String, FormatError> {
    match tag {
        FormatTag::Json => serde_json::to_string_pretty(doc).map_err(|e| FormatError::Print {
            tag: tag.as_str(),
            message: e.to_string(),
        }),
        FormatTag::Yaml => serde_yaml::to_string(doc).map_err(|e| FormatError::Print {
            tag: tag.as_str(),
            message: e.to_string(),
        }),
    }
}

/// Re-serialize document text from one format to another.
pub fn convert(text: &str, from: FormatTag, to: FormatTag) -> Result<String, FormatError> {
    print(&parse(text, from)?, to)
}
