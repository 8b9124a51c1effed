//! Dot-separated property paths, parsed once and addressed by segment.
//!
//! Mapping rules address into nested property maps with paths like
//! `versioning.enabled`. Parsing the path string on every access would
//! repeat the same split work per resource, so the path is an explicit
//! segment list constructed (and validated for emptiness) up front.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PanconfigError;

use super::value::{Properties, Value};

/// A validated, non-empty path into a nested property map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Parses a dot-separated path.
    ///
    /// # Errors
    /// Returns [`PanconfigError::InvalidPropertyPath`] if the input is
    /// empty or contains an empty segment (`"a..b"`, `".a"`).
    pub fn parse(path: &str) -> Result<Self, PanconfigError> {
        if path.is_empty() {
            return Err(PanconfigError::InvalidPropertyPath(path.to_string()));
        }

        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PanconfigError::InvalidPropertyPath(path.to_string()));
        }

        Ok(Self { segments })
    }

    /// The path's segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Reads the value at this path, if present.
    pub fn get<'a>(&self, properties: &'a Properties) -> Option<&'a Value> {
        let (last, parents) = self.segments.split_last()?;

        let mut current = properties;
        for segment in parents {
            current = current.get(segment)?.as_map()?;
        }
        current.get(last)
    }

    /// Removes and returns the value at this path, if present.
    ///
    /// Only the leaf entry is removed; intermediate maps emptied by the
    /// removal are left in place, matching how the source shape is
    /// preserved for unmapped siblings.
    pub fn remove(&self, properties: &mut Properties) -> Option<Value> {
        let (last, parents) = self.segments.split_last()?;

        let mut current = properties;
        for segment in parents {
            current = match current.get_mut(segment) {
                Some(Value::Map(map)) => map,
                _ => return None,
            };
        }
        current.remove(last)
    }

    /// Writes a value at this path, creating intermediate maps as needed.
    ///
    /// A non-map value found along the way is overwritten with a fresh map,
    /// per the mapping engine's rewrite contract.
    pub fn set(&self, properties: &mut Properties, value: Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = properties;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Map(Properties::new()));
            if !matches!(entry, Value::Map(_)) {
                *entry = Value::Map(Properties::new());
            }
            let Value::Map(map) = entry else {
                return;
            };
            current = map;
        }
        current.insert(last.clone(), value);
    }
}

impl FromStr for PropertyPath {
    type Err = PanconfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PropertyPath {
    type Error = PanconfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PropertyPath> for String {
    fn from(path: PropertyPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}
