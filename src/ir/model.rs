//! Core document model for the panconfig intermediate representation.
//!
//! This module defines the canonical language-agnostic representation of an
//! infrastructure configuration. All parser plugins convert into this IR,
//! and all generator plugins convert out of it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::metadata::Metadata;
use super::value::{Expression, Properties, Value};

/// Current IR schema version tag.
pub const SCHEMA_VERSION: &str = "1.0";

/// A complete configuration document in the panconfig IR.
///
/// This is the central data structure that every translation works
/// through. Think of it as the "AST" in a compiler - source languages
/// parse into this representation, and this representation renders out to
/// target languages. A document is per-call, engine-transient data: it is
/// produced by one parse, optionally rewritten during one generate, and
/// has no lifetime beyond that translation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// IR schema version this document conforms to.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// All declared resources. Names are unique within a document; a
    /// violation is a validation finding, not a construction failure.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,

    /// All declared input variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,

    /// All declared outputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Output>,

    /// All module calls.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ModuleCall>,

    /// Structural nodes that do not fit the four main collections:
    /// conditionals, loops, and opaque nodes preserved from newer schema
    /// versions or unrecognized source constructs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<Node>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Default for Document {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            resources: Vec::new(),
            variables: Vec::new(),
            outputs: Vec::new(),
            modules: Vec::new(),
            extras: Vec::new(),
        }
    }
}

impl Document {
    /// Creates an empty document at the current schema version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resource names that appear more than once.
    pub fn duplicate_resource_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut duplicates = Vec::new();
        for resource in &self.resources {
            if !seen.insert(resource.name.as_str())
                && !duplicates.contains(&resource.name.as_str())
            {
                duplicates.push(resource.name.as_str());
            }
        }
        duplicates
    }

    /// `(resource, dependency)` pairs where the dependency names nothing in
    /// this document. Dangling references are legal at parse time (forward
    /// references across modules exist); they surface as validation
    /// findings.
    pub fn dangling_dependencies(&self) -> Vec<(&str, &str)> {
        let names: BTreeSet<&str> = self.resources.iter().map(|r| r.name.as_str()).collect();

        self.resources
            .iter()
            .flat_map(|resource| {
                resource
                    .depends_on
                    .iter()
                    .filter(|dep| !names.contains(dep.as_str()))
                    .map(|dep| (resource.name.as_str(), dep.as_str()))
            })
            .collect()
    }

    /// Returns true if the document declares nothing at all.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
            && self.variables.is_empty()
            && self.outputs.is_empty()
            && self.modules.is_empty()
            && self.extras.is_empty()
    }
}

/// Discriminant for IR node types.
///
/// A node's kind is fixed at construction; consumers dispatch on it and
/// must treat [`NodeKind::Opaque`] as pass-through data, never as a fatal
/// condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Resource,
    Variable,
    Output,
    Module,
    Conditional,
    Loop,
    Opaque,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Resource => "resource",
            NodeKind::Variable => "variable",
            NodeKind::Output => "output",
            NodeKind::Module => "module",
            NodeKind::Conditional => "conditional",
            NodeKind::Loop => "loop",
            NodeKind::Opaque => "opaque",
        };
        write!(f, "{}", name)
    }
}

/// Any IR node, for positions where the node type is not fixed
/// (conditional branches, loop bodies, document extras).
///
/// The enum is closed so generator dispatch is exhaustiveness-checked; the
/// `Opaque` variant is the escape hatch that keeps unknown data flowing
/// through instead of being dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Resource(Resource),
    Variable(Variable),
    Output(Output),
    Module(ModuleCall),
    Conditional(Conditional),
    Loop(Loop),
    Opaque(OpaqueNode),
}

impl Node {
    /// The node's kind discriminant.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Resource(_) => NodeKind::Resource,
            Node::Variable(_) => NodeKind::Variable,
            Node::Output(_) => NodeKind::Output,
            Node::Module(_) => NodeKind::Module,
            Node::Conditional(_) => NodeKind::Conditional,
            Node::Loop(_) => NodeKind::Loop,
            Node::Opaque(_) => NodeKind::Opaque,
        }
    }

    /// The node's metadata.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Node::Resource(n) => &n.meta,
            Node::Variable(n) => &n.meta,
            Node::Output(n) => &n.meta,
            Node::Module(n) => &n.meta,
            Node::Conditional(n) => &n.meta,
            Node::Loop(n) => &n.meta,
            Node::Opaque(n) => &n.meta,
        }
    }
}

/// A declared infrastructure resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Vendor-qualified type tag (e.g. `aws_s3_bucket`). Opaque to the
    /// core; rewritten by the mapping engine during generation.
    pub resource_type: String,

    /// Name of the resource, unique within the document.
    pub name: String,

    /// Nested property map.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,

    /// Names of resources this one must be created after. Order is kept
    /// for deterministic output; it carries no meaning beyond "before".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

impl Resource {
    /// Creates a resource with no properties or dependencies.
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
            properties: Properties::new(),
            depends_on: Vec::new(),
            meta: Metadata::new(),
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds an ordering dependency on another resource name.
    pub fn with_dependency(mut self, name: impl Into<String>) -> Self {
        self.depends_on.push(name.into());
        self
    }

    /// Attaches metadata.
    pub fn with_meta(mut self, meta: Metadata) -> Self {
        self.meta = meta;
        self
    }
}

/// A declared input variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,

    /// Semantic type tag (`string`, `number`, `bool`, ...). Not validated
    /// against the default value at this layer.
    pub value_type: String,

    /// Optional default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

impl Variable {
    /// Creates a variable with the given name and type tag.
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            default_value: None,
            description: None,
            meta: Metadata::new(),
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A declared output value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Output name.
    pub name: String,

    /// The value exposed by this output.
    pub value: Expression,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

impl Output {
    /// Creates an output exposing the given expression.
    pub fn new(name: impl Into<String>, value: Expression) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
            meta: Metadata::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A call to an external module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleCall {
    /// Module call name.
    pub name: String,

    /// Opaque locator for the module source (path, registry address, URL).
    pub source: String,

    /// Input values passed to the module.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: Properties,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

impl ModuleCall {
    /// Creates a module call with no inputs.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            inputs: Properties::new(),
            meta: Metadata::new(),
        }
    }

    /// Adds an input value.
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

/// A conditional block: a governing expression and two branches of nested
/// nodes. Present in the schema for extensibility; the reference plugins
/// surface it as an unsupported feature rather than translating it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    /// The condition controlling branch selection.
    pub condition: Expression,

    /// Nodes for the true branch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then_branch: Vec<Node>,

    /// Nodes for the false branch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub else_branch: Vec<Node>,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

/// A loop block: a governing expression and a body of nested nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    /// The expression producing the iteration space.
    pub iterator: Expression,

    /// Nodes instantiated per iteration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<Node>,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

/// A node whose kind this schema version does not know.
///
/// Consumers must carry it through (or flag it unsupported) rather than
/// drop it: forward compatibility requires unknown kinds to survive a
/// translation round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpaqueNode {
    /// The original kind tag, preserved verbatim.
    pub original_kind: String,

    /// The node's payload, preserved verbatim.
    pub payload: Value,

    /// Source location, comments, and annotations.
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub meta: Metadata,
}

impl OpaqueNode {
    /// Creates an opaque node carrying the given kind tag and payload.
    pub fn new(original_kind: impl Into<String>, payload: Value) -> Self {
        Self {
            original_kind: original_kind.into(),
            payload,
            meta: Metadata::new(),
        }
    }
}
