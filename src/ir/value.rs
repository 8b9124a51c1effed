//! The recursive property value type and expression variants.
//!
//! `Value` is the closed sum over everything a configuration property can
//! hold: scalar literals, expressions, ordered lists, and string-keyed
//! maps. Values are built bottom-up during parsing, so the representation
//! cannot contain cycles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A nested property map, the shape of `Resource::properties` and
/// `ModuleCall::inputs`. `BTreeMap` keeps iteration deterministic so
/// generated output is stable across runs.
pub type Properties = BTreeMap<String, Value>;

/// A property value.
///
/// The `Expr` variant must precede `Map` in the declaration: serialization
/// is untagged, and an expression's JSON form is a map carrying the
/// reserved `$expr` discriminant, so deserialization has to try it first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean literal.
    Bool(bool),

    /// A numeric literal. Stored as f64; integral values are rendered
    /// without a fractional part by generators.
    Number(f64),

    /// A string literal.
    String(String),

    /// An embedded expression (reference, function call, or wrapped
    /// literal).
    Expr(Expression),

    /// An ordered list of values.
    List(Vec<Value>),

    /// A string-keyed map of values.
    Map(Properties),
}

impl Value {
    /// Returns the string payload, if this is a string literal.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a number literal.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the map payload, if this is a map.
    pub fn as_map(&self) -> Option<&Properties> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the list payload, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the expression payload, if this is an expression.
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Expr(e) => Some(e),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Expression> for Value {
    fn from(e: Expression) -> Self {
        Value::Expr(e)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Properties> for Value {
    fn from(map: Properties) -> Self {
        Value::Map(map)
    }
}

/// The discriminant of an [`Expression`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprKind {
    /// An opaque function-call description. The payload is whatever the
    /// source parser captured; target generators that cannot translate it
    /// surface it as an unsupported feature.
    Function,

    /// A reference to another entity, carried as a dotted-path string
    /// (e.g. `var.region` or `aws_iam_role.role_a.arn`).
    Reference,

    /// A plain value wrapped in expression position.
    Literal,
}

/// An expression embedded in a property value or output.
///
/// Serialized as a map with the reserved `$expr` key so that untagged
/// [`Value`] deserialization can tell an expression apart from an ordinary
/// property map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// What kind of expression this is.
    #[serde(rename = "$expr")]
    pub kind: ExprKind,

    /// The kind-dependent payload.
    pub value: Box<Value>,
}

impl Expression {
    /// Creates a reference expression from a dotted path.
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            kind: ExprKind::Reference,
            value: Box::new(Value::String(path.into())),
        }
    }

    /// Creates an opaque function-call expression.
    pub fn function(call: impl Into<String>) -> Self {
        Self {
            kind: ExprKind::Function,
            value: Box::new(Value::String(call.into())),
        }
    }

    /// Wraps a value as a literal expression.
    pub fn literal(value: Value) -> Self {
        Self {
            kind: ExprKind::Literal,
            value: Box::new(value),
        }
    }
}
