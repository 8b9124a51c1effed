//! IR JSON parser and generator plugins.
//!
//! The IR's own JSON form registered as a language. It is the lossless
//! hub format: translating anything to `ir-json` shows exactly what the
//! parser produced, and translating from `ir-json` feeds a hand-written
//! document to any generator. Both contract sides are implemented here,
//! so the language reports full support.

use crate::ir::{io_json, Document, SourceLocation};
use crate::plugin::{
    Diagnostic, GenerateContext, GenerateResult, Generator, ParseContext, ParseResult, Parser,
    SyntaxReport,
};

/// Parser for documents already in the panconfig IR JSON form.
pub struct IrJsonParser;

impl Parser for IrJsonParser {
    fn language_name(&self) -> &str {
        "ir-json"
    }

    fn file_extensions(&self) -> &[&str] {
        &["ir.json"]
    }

    fn parse(&self, source: &str, ctx: &ParseContext) -> ParseResult {
        match io_json::from_json_str(source) {
            Ok(document) => ParseResult::success(document),
            Err(err) => {
                let mut location =
                    SourceLocation::new(err.line() as u32, err.column() as u32);
                if let Some(path) = &ctx.file_path {
                    location = location.with_file(path.display().to_string());
                }
                ParseResult::failure(vec![Diagnostic::error(format!(
                    "invalid IR JSON: {}",
                    err
                ))
                .with_location(location)])
            }
        }
    }

    fn validate_syntax(&self, source: &str) -> SyntaxReport {
        match serde_json::from_str::<serde_json::Value>(source) {
            Ok(_) => SyntaxReport::clean(),
            Err(err) => SyntaxReport::invalid(vec![Diagnostic::error(format!(
                "JSON syntax error: {}",
                err
            ))
            .with_location(SourceLocation::new(
                err.line() as u32,
                err.column() as u32,
            ))]),
        }
    }
}

/// Generator emitting the panconfig IR JSON form.
pub struct IrJsonGenerator;

impl Generator for IrJsonGenerator {
    fn language_name(&self) -> &str {
        "ir-json"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn generate(&self, document: &Document, _ctx: &GenerateContext) -> GenerateResult {
        match io_json::to_json_string(document) {
            Ok(output) => GenerateResult::success(output),
            Err(err) => GenerateResult::failure(vec![Diagnostic::error(format!(
                "failed to serialize IR: {}",
                err
            ))]),
        }
    }

    fn format_output(&self, output: &str) -> String {
        let mut formatted = output.trim_end().to_string();
        formatted.push('\n');
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Resource;

    #[test]
    fn roundtrips_through_both_sides() {
        let document = Document {
            resources: vec![Resource::new("aws_s3_bucket", "assets")
                .with_property("bucket", "my-test-bucket")],
            ..Default::default()
        };

        let generated = IrJsonGenerator.generate(&document, &GenerateContext::default());
        assert!(generated.is_success());
        assert!(generated.unsupported_features.is_empty(), "hub format is lossless");

        let parsed = IrJsonParser.parse(
            generated.output.as_deref().expect("output"),
            &ParseContext::default(),
        );
        assert!(parsed.is_success());
        assert_eq!(parsed.document.expect("document"), document);
    }

    #[test]
    fn schema_violations_fail_the_parse_not_the_syntax_check() {
        // Well-formed JSON that is not an IR document.
        let source = r#"{"resources": "not-a-list"}"#;

        assert!(IrJsonParser.validate_syntax(source).is_valid());

        let parsed = IrJsonParser.parse(source, &ParseContext::default());
        assert!(!parsed.is_success());
        assert!(parsed.errors[0].location.is_some());
    }

    #[test]
    fn unknown_syntax_error_carries_line_and_column() {
        let report = IrJsonParser.validate_syntax("{\n  \"resources\": [\n");
        assert!(!report.is_valid());

        let location = report.errors[0].location.as_ref().expect("location");
        assert!(location.line >= 2);
    }
}
