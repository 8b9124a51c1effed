//! Plugin contracts for language front-ends and back-ends.
//!
//! A language joins panconfig by implementing one or both capability
//! traits: [`Parser`] turns source text into an IR [`Document`] plus
//! diagnostics, [`Generator`] turns a document into target text plus
//! diagnostics. The two sides are independent - a language may register
//! only one of them and is then reported as partially supported.
//!
//! # Contract rules
//!
//! - `parse` never panics for any input; every failure is returned as
//!   structured [`Diagnostic`]s on the [`ParseResult`].
//! - `generate` degrades gracefully: a node kind the generator does not
//!   recognize becomes an [`UnsupportedFeature`] notice (with a
//!   best-effort placeholder when the node is structurally required), and
//!   generation fails outright only when no output can be produced at all.
//! - `format_output` is pure text reshaping and cannot fail.

pub mod registry;

pub use registry::PluginRegistry;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::ir::{Document, SourceLocation, Value};

/// Severity of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// A non-fatal finding; never blocks the translation on its own.
    Warning,
    /// A fatal finding for the phase that produced it.
    Error,
}

/// A single structured finding from a parser or generator.
#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    /// How severe the finding is.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// Where in the source the finding points, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    /// Attaches a source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        match &self.location {
            Some(location) => write!(f, "[{}] {}: {}", severity, location, self.message),
            None => write!(f, "[{}] {}", severity, self.message),
        }
    }
}

/// Per-call input to [`Parser::parse`].
///
/// The options map is plugin-defined configuration: the core passes it
/// through opaquely and attaches no meaning to any key.
#[derive(Clone, Debug, Default)]
pub struct ParseContext {
    /// Originating file, for diagnostics. Absent for in-memory sources.
    pub file_path: Option<PathBuf>,

    /// Opaque plugin-defined options.
    pub options: BTreeMap<String, Value>,
}

/// Per-call input to [`Generator::generate`].
#[derive(Clone, Debug, Default)]
pub struct GenerateContext {
    /// Opaque plugin-defined options.
    pub options: BTreeMap<String, Value>,

    /// Target language/template version requested by the caller.
    pub target_version: Option<String>,

    /// The language the document was parsed from, stamped by the
    /// translation engine. Generators key resource-mapping lookups on it;
    /// when absent, mappings simply miss and resources pass through
    /// unchanged.
    pub source_language: Option<String>,
}

/// The outcome of a parse.
#[derive(Clone, Debug, Default)]
pub struct ParseResult {
    /// The parsed document, present on success.
    pub document: Option<Document>,

    /// Fatal findings.
    pub errors: Vec<Diagnostic>,

    /// Non-fatal findings.
    pub warnings: Vec<Diagnostic>,
}

impl ParseResult {
    /// A successful parse.
    pub fn success(document: Document) -> Self {
        Self {
            document: Some(document),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A failed parse carrying the collected errors.
    pub fn failure(errors: Vec<Diagnostic>) -> Self {
        Self {
            document: None,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Appends a warning.
    pub fn with_warning(mut self, warning: Diagnostic) -> Self {
        self.warnings.push(warning);
        self
    }

    /// True iff a document was produced and no errors were reported.
    pub fn is_success(&self) -> bool {
        self.document.is_some() && self.errors.is_empty()
    }
}

/// The outcome of a standalone syntax check ([`Parser::validate_syntax`]).
#[derive(Clone, Debug, Default)]
pub struct SyntaxReport {
    /// Syntax findings; empty when the source is well-formed.
    pub errors: Vec<Diagnostic>,
}

impl SyntaxReport {
    /// A clean report.
    pub fn clean() -> Self {
        Self::default()
    }

    /// A report carrying syntax errors.
    pub fn invalid(errors: Vec<Diagnostic>) -> Self {
        Self { errors }
    }

    /// True iff no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A known gap between the IR and a target language.
///
/// Unsupported features are orthogonal to success: a generation can
/// succeed while reporting any number of them. The translation engine
/// converts each into a generate-phase warning.
#[derive(Clone, Debug, Serialize)]
pub struct UnsupportedFeature {
    /// Short identifier of what could not be translated.
    pub feature: String,

    /// What was done instead (dropped, emitted unchanged, placeholder).
    pub description: String,

    /// Where the construct came from, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl UnsupportedFeature {
    /// Creates an unsupported-feature notice.
    pub fn new(feature: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            description: description.into(),
            location: None,
        }
    }

    /// Attaches a source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// The outcome of a generation.
#[derive(Clone, Debug, Default)]
pub struct GenerateResult {
    /// The generated target text, present on success.
    pub output: Option<String>,

    /// Fatal findings.
    pub errors: Vec<Diagnostic>,

    /// Non-fatal findings.
    pub warnings: Vec<Diagnostic>,

    /// Constructs with no target-language equivalent.
    pub unsupported_features: Vec<UnsupportedFeature>,
}

impl GenerateResult {
    /// A successful generation.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            ..Default::default()
        }
    }

    /// A failed generation carrying the collected errors.
    pub fn failure(errors: Vec<Diagnostic>) -> Self {
        Self {
            errors,
            ..Default::default()
        }
    }

    /// Appends an unsupported-feature notice.
    pub fn with_unsupported(mut self, feature: UnsupportedFeature) -> Self {
        self.unsupported_features.push(feature);
        self
    }

    /// True iff output was produced and no errors were reported.
    /// Unsupported features do not affect this.
    pub fn is_success(&self) -> bool {
        self.output.is_some() && self.errors.is_empty()
    }
}

/// A source-language front-end.
pub trait Parser: Send + Sync {
    /// Identity key for registry lookups; matched case-insensitively.
    fn language_name(&self) -> &str;

    /// File extensions this parser accepts (without leading dot). Must be
    /// non-empty; enforced at registration.
    fn file_extensions(&self) -> &[&str];

    /// Parses source text into an IR document.
    ///
    /// Must not panic for any input; all failure is reported through the
    /// result's error list.
    fn parse(&self, source: &str, ctx: &ParseContext) -> ParseResult;

    /// Checks the source for syntax errors without building an IR.
    fn validate_syntax(&self, source: &str) -> SyntaxReport;
}

/// A target-language back-end.
pub trait Generator: Send + Sync {
    /// Identity key for registry lookups; matched case-insensitively.
    fn language_name(&self) -> &str;

    /// File extension for generated output (without leading dot). Must be
    /// non-empty; enforced at registration.
    fn file_extension(&self) -> &str;

    /// Renders an IR document as target-language text.
    fn generate(&self, document: &Document, ctx: &GenerateContext) -> GenerateResult;

    /// Reformats generated text. Pure reshaping; cannot fail.
    fn format_output(&self, output: &str) -> String;
}
