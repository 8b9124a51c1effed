//! The translation engine: parse, validate, generate, format.
//!
//! Each call runs a strictly sequential state machine:
//!
//! ```text
//! Lookup -> (Validate) -> Parse -> Generate -> (Format) -> Done
//! ```
//!
//! with a failure terminal at each of the first four states. The engine
//! holds no per-call state of its own - the only durable input is the
//! plugin registry it borrows - so concurrent translations against a
//! stable registry are safe. Diagnostics are aggregated across phases and
//! phase-tagged; unsupported-feature notices never block success.

mod report;

pub use report::{LanguageSupport, Phase, TranslationIssue, TranslationOutcome, ValidationReport};

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::ir::Value;
use crate::plugin::{GenerateContext, ParseContext, PluginRegistry};

/// Options controlling a single translation call.
#[derive(Clone, Debug, Default)]
pub struct TranslateOptions {
    /// Run the parser's syntax validation before parsing; any reported
    /// error fails the call without a parse or generate attempt.
    pub validate_before: bool,

    /// Pass the generated text through the generator's formatter.
    pub format_output: bool,

    /// Originating file for diagnostics, if the source came from one.
    pub file_path: Option<PathBuf>,

    /// Opaque options forwarded to the parser.
    pub parser_options: BTreeMap<String, Value>,

    /// Opaque options forwarded to the generator.
    pub generator_options: BTreeMap<String, Value>,

    /// Target language/template version forwarded to the generator.
    pub target_version: Option<String>,
}

/// Orchestrates translations against a plugin registry.
///
/// The engine borrows the registry rather than owning it: plugin
/// composition and lifetime belong to the embedding application.
pub struct TranslationEngine<'a> {
    registry: &'a PluginRegistry,
}

impl<'a> TranslationEngine<'a> {
    /// Creates an engine over the given registry.
    pub fn new(registry: &'a PluginRegistry) -> Self {
        Self { registry }
    }

    /// Translates source text from one language to another.
    ///
    /// All failure modes are reported through the outcome's phase-tagged
    /// error list; this method does not panic for any input. On success
    /// the outcome carries the generated text, the IR it passed through,
    /// and every warning accumulated along the way (including one per
    /// unsupported feature the generator reported).
    pub fn translate(
        &self,
        source: &str,
        source_language: &str,
        target_language: &str,
        options: &TranslateOptions,
    ) -> TranslationOutcome {
        // Lookup: both plugins must resolve before any work happens.
        let Some(parser) = self.registry.parser(source_language) else {
            return TranslationOutcome::failed(TranslationIssue::error(
                Phase::Lookup,
                format!("no parser registered for language '{}'", source_language),
            ));
        };
        let Some(generator) = self.registry.generator(target_language) else {
            return TranslationOutcome::failed(TranslationIssue::error(
                Phase::Lookup,
                format!(
                    "no generator registered for language '{}'",
                    target_language
                ),
            ));
        };

        // Validate: optional pre-parse syntax gate.
        if options.validate_before {
            let syntax = parser.validate_syntax(source);
            if !syntax.is_valid() {
                return TranslationOutcome {
                    errors: syntax
                        .errors
                        .into_iter()
                        .map(|d| TranslationIssue::from_diagnostic(Phase::Validate, d))
                        .collect(),
                    ..Default::default()
                };
            }
        }

        // Parse.
        let parse_ctx = ParseContext {
            file_path: options.file_path.clone(),
            options: options.parser_options.clone(),
        };
        let parsed = parser.parse(source, &parse_ctx);

        let mut warnings: Vec<TranslationIssue> = parsed
            .warnings
            .into_iter()
            .map(|d| TranslationIssue::from_diagnostic(Phase::Parse, d))
            .collect();

        let document = match parsed.document {
            Some(document) if parsed.errors.is_empty() => document,
            _ => {
                let mut errors: Vec<TranslationIssue> = parsed
                    .errors
                    .into_iter()
                    .map(|d| TranslationIssue::from_diagnostic(Phase::Parse, d))
                    .collect();
                if errors.is_empty() {
                    // A parser returning neither document nor errors
                    // violates its contract; report it rather than
                    // trusting it.
                    errors.push(TranslationIssue::error(
                        Phase::Parse,
                        "parser produced no document and no errors",
                    ));
                }
                return TranslationOutcome {
                    errors,
                    warnings,
                    ..Default::default()
                };
            }
        };

        // Generate.
        let generate_ctx = GenerateContext {
            options: options.generator_options.clone(),
            target_version: options.target_version.clone(),
            source_language: Some(source_language.to_string()),
        };
        let generated = generator.generate(&document, &generate_ctx);

        warnings.extend(
            generated
                .warnings
                .into_iter()
                .map(|d| TranslationIssue::from_diagnostic(Phase::Generate, d)),
        );

        // Unsupported features degrade gracefully: each becomes a
        // generate-phase warning, never an error.
        warnings.extend(generated.unsupported_features.into_iter().map(|feature| {
            let mut issue = TranslationIssue::warning(
                Phase::Generate,
                format!("unsupported feature `{}`: {}", feature.feature, feature.description),
            );
            issue.location = feature.location;
            issue
        }));

        if !generated.errors.is_empty() || generated.output.is_none() {
            let mut errors: Vec<TranslationIssue> = generated
                .errors
                .into_iter()
                .map(|d| TranslationIssue::from_diagnostic(Phase::Generate, d))
                .collect();
            if errors.is_empty() {
                errors.push(TranslationIssue::error(
                    Phase::Generate,
                    "generator produced no output and no errors",
                ));
            }
            // The parsed IR is retained for its diagnostic value.
            return TranslationOutcome {
                document: Some(document),
                errors,
                warnings,
                ..Default::default()
            };
        }

        // Format: pure text reshaping, cannot fail by contract.
        let mut output = generated.output;
        if options.format_output {
            output = output.map(|text| generator.format_output(&text));
        }

        TranslationOutcome {
            output,
            document: Some(document),
            errors: Vec::new(),
            warnings,
        }
    }

    /// Validation-only mode: resolves the parser and runs its syntax
    /// check. No generator is touched and no IR is built.
    pub fn validate(&self, source: &str, language: &str) -> ValidationReport {
        let Some(parser) = self.registry.parser(language) else {
            return ValidationReport {
                language: language.to_string(),
                issues: vec![TranslationIssue::error(
                    Phase::Lookup,
                    format!("no parser registered for language '{}'", language),
                )],
            };
        };

        ValidationReport {
            language: language.to_string(),
            issues: parser
                .validate_syntax(source)
                .errors
                .into_iter()
                .map(|d| TranslationIssue::from_diagnostic(Phase::Validate, d))
                .collect(),
        }
    }

    /// Reports every language either registry side knows about, with
    /// independent parse/generate capability flags. A language with only
    /// one side registered is reported as partially supported, not
    /// omitted.
    pub fn supported_languages(&self) -> Vec<LanguageSupport> {
        let mut supported: Vec<LanguageSupport> = Vec::new();

        for name in self.registry.parser_languages() {
            let extensions = self
                .registry
                .parser(name)
                .map(|p| p.file_extensions().iter().map(|e| e.to_string()).collect())
                .unwrap_or_default();

            supported.push(LanguageSupport {
                name: name.to_string(),
                can_parse: true,
                can_generate: false,
                source_extensions: extensions,
                target_extension: None,
            });
        }

        for name in self.registry.generator_languages() {
            let extension = self.registry.generator(name).map(|g| g.file_extension().to_string());

            match supported
                .iter_mut()
                .find(|entry| entry.name.eq_ignore_ascii_case(name))
            {
                Some(entry) => {
                    entry.can_generate = true;
                    entry.target_extension = extension;
                }
                None => supported.push(LanguageSupport {
                    name: name.to_string(),
                    can_parse: false,
                    can_generate: true,
                    source_extensions: Vec::new(),
                    target_extension: extension,
                }),
            }
        }

        supported
    }
}
