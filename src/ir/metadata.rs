//! Node metadata: source locations, preserved comments, and annotations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::value::Value;

/// A position in an originating source file.
///
/// Lines and columns are 1-based, matching what parsers such as serde_json
/// report. The file is optional because sources often arrive as in-memory
/// strings (stdin, tests) with no path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,

    /// 1-based column number.
    pub column: u32,

    /// Originating file, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl SourceLocation {
    /// Creates a location without a file.
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column,
            file: None,
        }
    }

    /// Sets the originating file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "line {}, column {}", self.line, self.column),
        }
    }
}

/// Metadata attached to every IR node.
///
/// Annotations are opaque plugin-to-plugin pass-through data: a consumer
/// that does not recognize an annotation key must carry it or ignore it,
/// never fail on it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Where the node came from in the source, if the parser knows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,

    /// Comments preserved from the source, in order of appearance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,

    /// Open-ended annotation map for plugin-specific extensions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, Value>,
}

impl Metadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no location, comments, or annotations are present.
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.comments.is_empty() && self.annotations.is_empty()
    }

    /// Sets the source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Appends a preserved comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Adds an annotation under the given key.
    pub fn with_annotation(mut self, key: impl Into<String>, value: Value) -> Self {
        self.annotations.insert(key.into(), value);
        self
    }
}
