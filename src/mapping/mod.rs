//! Resource-type and property mapping between language pairs.
//!
//! Generators consult this engine to rewrite vendor-specific resource
//! shapes: a mapping is registered for a (source language, target
//! language, source resource type) triple and carries an ordered list of
//! path-addressed property moves plus an ordered pipeline of whole-set
//! transformations for rewrites a single move cannot express.
//!
//! # Rewrite semantics
//!
//! - No mapping registered for the triple: the input properties pass
//!   through unchanged. An absent mapping is not an error - callers treat
//!   unknown types as pass-through and surface them as unsupported
//!   features where appropriate.
//! - Each [`PropertyMapping`] runs in declaration order: the value at the
//!   source path is removed (missing path skips the rule), the optional
//!   value transform applies, and the result is written at the target
//!   path, creating intermediate maps and overwriting non-map values on
//!   the way.
//! - Each whole-set transformation then runs in declaration order, each
//!   receiving the previous stage's output.
//!
//! Unmapped properties are always preserved verbatim; nothing is dropped
//! here. Language names are matched case-insensitively; resource type
//! strings and property paths are case-sensitive.

use std::collections::HashMap;
use std::fmt;

use crate::error::PanconfigError;
use crate::ir::{Properties, PropertyPath, Value};

/// A per-value rewrite applied as part of a [`PropertyMapping`].
pub type ValueTransform = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// A whole-property-set rewrite, for changes a single path move cannot
/// express (e.g. "if flag X is set, replace it with a differently-named,
/// differently-typed property").
pub type PropertiesTransform = Box<dyn Fn(Properties) -> Properties + Send + Sync>;

/// One path-addressed property move.
pub struct PropertyMapping {
    /// Where the value lives in the source shape.
    pub source_path: PropertyPath,

    /// Where the value lands in the target shape.
    pub target_path: PropertyPath,

    transform: Option<ValueTransform>,
}

impl PropertyMapping {
    /// Creates a move between two parsed paths.
    pub fn new(source_path: PropertyPath, target_path: PropertyPath) -> Self {
        Self {
            source_path,
            target_path,
            transform: None,
        }
    }

    /// Creates a move from dotted path strings.
    ///
    /// # Errors
    /// Returns [`PanconfigError::InvalidPropertyPath`] if either path is
    /// empty or malformed.
    pub fn renamed(source: &str, target: &str) -> Result<Self, PanconfigError> {
        Ok(Self::new(
            PropertyPath::parse(source)?,
            PropertyPath::parse(target)?,
        ))
    }

    /// Attaches a value transform applied between removal and insertion.
    pub fn with_transform(
        mut self,
        transform: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.transform = Some(Box::new(transform));
        self
    }
}

impl fmt::Debug for PropertyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapping")
            .field("source_path", &self.source_path)
            .field("target_path", &self.target_path)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// The full rewrite rule set for one source resource type.
pub struct ResourceTypeMapping {
    /// The source-language type tag this mapping applies to.
    pub source_type: String,

    /// The target-language type tag to emit.
    pub target_type: String,

    properties: Vec<PropertyMapping>,
    transformations: Vec<PropertiesTransform>,
}

impl ResourceTypeMapping {
    /// Creates a mapping with no property rules.
    pub fn new(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            target_type: target_type.into(),
            properties: Vec::new(),
            transformations: Vec::new(),
        }
    }

    /// Appends a property move; rules run in the order they are added.
    pub fn with_property(mut self, mapping: PropertyMapping) -> Self {
        self.properties.push(mapping);
        self
    }

    /// Appends a whole-set transformation; transformations run after all
    /// property moves, in the order they are added.
    pub fn with_transformation(
        mut self,
        transformation: impl Fn(Properties) -> Properties + Send + Sync + 'static,
    ) -> Self {
        self.transformations.push(Box::new(transformation));
        self
    }

    /// Applies this mapping's rewrite pipeline to a property set.
    fn apply(&self, mut properties: Properties) -> Properties {
        for rule in &self.properties {
            let Some(value) = rule.source_path.remove(&mut properties) else {
                continue;
            };
            let value = match &rule.transform {
                Some(transform) => transform(value),
                None => value,
            };
            rule.target_path.set(&mut properties, value);
        }

        for transformation in &self.transformations {
            properties = transformation(properties);
        }

        properties
    }
}

impl fmt::Debug for ResourceTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTypeMapping")
            .field("source_type", &self.source_type)
            .field("target_type", &self.target_type)
            .field("properties", &self.properties)
            .field("transformations", &self.transformations.len())
            .finish()
    }
}

/// The language-pair-keyed mapping table.
#[derive(Debug, Default)]
pub struct MappingEngine {
    mappings: HashMap<(String, String), HashMap<String, ResourceTypeMapping>>,
}

impl MappingEngine {
    /// Creates an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a mapping for a language pair. A mapping already present
    /// for the same (pair, source type) is replaced.
    pub fn register_mapping(
        &mut self,
        source_language: &str,
        target_language: &str,
        mapping: ResourceTypeMapping,
    ) {
        self.mappings
            .entry(pair_key(source_language, target_language))
            .or_default()
            .insert(mapping.source_type.clone(), mapping);
    }

    /// Looks up the target type tag for a source type, if mapped.
    ///
    /// `None` means "no mapping": callers pass the type through unchanged.
    pub fn map_resource_type(
        &self,
        source_language: &str,
        target_language: &str,
        source_type: &str,
    ) -> Option<&str> {
        self.mapping(source_language, target_language, source_type)
            .map(|m| m.target_type.as_str())
    }

    /// Rewrites a property set for a source type.
    ///
    /// Identity when no mapping is registered for the triple.
    pub fn map_properties(
        &self,
        source_language: &str,
        target_language: &str,
        source_type: &str,
        properties: Properties,
    ) -> Properties {
        match self.mapping(source_language, target_language, source_type) {
            Some(mapping) => mapping.apply(properties),
            None => properties,
        }
    }

    /// Returns true if a mapping is registered for the triple.
    pub fn has_mapping(
        &self,
        source_language: &str,
        target_language: &str,
        source_type: &str,
    ) -> bool {
        self.mapping(source_language, target_language, source_type)
            .is_some()
    }

    fn mapping(
        &self,
        source_language: &str,
        target_language: &str,
        source_type: &str,
    ) -> Option<&ResourceTypeMapping> {
        self.mappings
            .get(&pair_key(source_language, target_language))?
            .get(source_type)
    }
}

fn pair_key(source_language: &str, target_language: &str) -> (String, String) {
    (
        source_language.to_ascii_lowercase(),
        target_language.to_ascii_lowercase(),
    )
}
