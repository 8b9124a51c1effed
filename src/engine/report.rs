//! Phase-tagged diagnostics and result types for translation calls.
//!
//! Every error and warning a translation produces carries the phase that
//! produced it, so a caller can tell "your input doesn't parse" apart from
//! "your target doesn't support X" without string matching.

use serde::Serialize;
use std::fmt;

use crate::ir::{Document, SourceLocation};
use crate::plugin::{Diagnostic, Severity};

/// The phase of the translation state machine that produced a finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Plugin resolution from the registry.
    Lookup,
    /// Pre-parse syntax validation.
    Validate,
    /// Source-to-IR parsing.
    Parse,
    /// IR-to-target generation.
    Generate,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Lookup => "lookup",
            Phase::Validate => "validate",
            Phase::Parse => "parse",
            Phase::Generate => "generate",
        };
        write!(f, "{}", name)
    }
}

/// A single phase-tagged finding from a translation call.
#[derive(Clone, Debug, Serialize)]
pub struct TranslationIssue {
    /// The phase that produced the finding.
    pub phase: Phase,

    /// How severe the finding is.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// Where in the source the finding points, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl TranslationIssue {
    /// Creates an error issue.
    pub fn error(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            severity: Severity::Error,
            message: message.into(),
            location: None,
        }
    }

    /// Creates a warning issue.
    pub fn warning(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            phase,
            severity: Severity::Warning,
            message: message.into(),
            location: None,
        }
    }

    /// Tags a plugin diagnostic with the phase that ran the plugin.
    pub fn from_diagnostic(phase: Phase, diagnostic: Diagnostic) -> Self {
        Self {
            phase,
            severity: diagnostic.severity,
            message: diagnostic.message,
            location: diagnostic.location,
        }
    }
}

impl fmt::Display for TranslationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        match &self.location {
            Some(location) => write!(
                f,
                "[{} {}] {}: {}",
                severity, self.phase, location, self.message
            ),
            None => write!(f, "[{} {}] {}", severity, self.phase, self.message),
        }
    }
}

/// The result of one translation call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TranslationOutcome {
    /// Generated target text, present iff the call succeeded.
    pub output: Option<String>,

    /// The parsed IR, retained once parsing succeeds - even when
    /// generation later fails, for its diagnostic value.
    #[serde(skip)]
    pub document: Option<Document>,

    /// Fatal findings; empty on success.
    pub errors: Vec<TranslationIssue>,

    /// Non-fatal findings accumulated across all phases.
    pub warnings: Vec<TranslationIssue>,
}

impl TranslationOutcome {
    /// A failed outcome carrying a single issue.
    pub(crate) fn failed(issue: TranslationIssue) -> Self {
        Self {
            errors: vec![issue],
            ..Default::default()
        }
    }

    /// True iff output was produced and no errors were reported.
    pub fn is_success(&self) -> bool {
        self.output.is_some() && self.errors.is_empty()
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl fmt::Display for TranslationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_success() {
            writeln!(f, "Translation succeeded with {} warning(s)", self.warning_count())?;
        } else {
            writeln!(
                f,
                "Translation failed with {} error(s) and {} warning(s)",
                self.error_count(),
                self.warning_count()
            )?;
        }

        for issue in self.errors.iter().chain(&self.warnings) {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// The result of a validation-only call.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    /// The language the source was checked against.
    pub language: String,

    /// Findings; empty when the source is valid.
    pub issues: Vec<TranslationIssue>,
}

impl ValidationReport {
    /// True iff no error-severity issues were found.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Number of error-severity issues.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(f, "Validation passed: no issues found");
        }

        writeln!(
            f,
            "Validation completed with {} error(s):",
            self.error_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// What the registry can do for one language.
#[derive(Clone, Debug, Serialize)]
pub struct LanguageSupport {
    /// The language's registered name.
    pub name: String,

    /// True if a parser is registered.
    pub can_parse: bool,

    /// True if a generator is registered.
    pub can_generate: bool,

    /// Source file extensions accepted by the parser, if registered.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source_extensions: Vec<String>,

    /// Output file extension produced by the generator, if registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_extension: Option<String>,
}

impl fmt::Display for LanguageSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let capability = match (self.can_parse, self.can_generate) {
            (true, true) => "parse, generate",
            (true, false) => "parse",
            (false, true) => "generate",
            (false, false) => "none",
        };
        write!(f, "{} ({})", self.name, capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_success_requires_output_and_no_errors() {
        let mut outcome = TranslationOutcome::default();
        assert!(!outcome.is_success());

        outcome.output = Some("Resources: {}".to_string());
        assert!(outcome.is_success());

        outcome
            .errors
            .push(TranslationIssue::error(Phase::Generate, "boom"));
        assert!(!outcome.is_success());
    }

    #[test]
    fn issue_display_carries_phase_tag() {
        let issue = TranslationIssue::error(Phase::Parse, "unexpected token")
            .to_string();
        assert_eq!(issue, "[ERROR parse] unexpected token");

        let issue = TranslationIssue::warning(Phase::Generate, "loop dropped");
        assert_eq!(issue.to_string(), "[WARN  generate] loop dropped");
    }

    #[test]
    fn issues_serialize_with_snake_case_tags() {
        let issue = TranslationIssue::warning(Phase::Generate, "x");
        let json = serde_json::to_string(&issue).expect("serialize");
        assert!(json.contains("\"phase\":\"generate\""));
        assert!(json.contains("\"severity\":\"warning\""));
    }

    #[test]
    fn validation_report_counts_only_errors() {
        let report = ValidationReport {
            language: "terraform".to_string(),
            issues: vec![
                TranslationIssue::warning(Phase::Validate, "odd"),
                TranslationIssue::error(Phase::Validate, "bad"),
            ],
        };
        assert_eq!(report.error_count(), 1);
        assert!(!report.is_valid());
    }
}
