//! Terraform (JSON syntax) parser plugin.
//!
//! Reads Terraform's JSON configuration syntax: a top-level object whose
//! `resource`, `variable`, `output`, and `module` keys hold the familiar
//! nested block structure. HCL native syntax is out of scope for the
//! reference plugin; `terraform` tooling can emit the JSON form.
//!
//! # Parsing policies
//!
//! - `${...}` interpolation strings become IR expressions: a plain dotted
//!   path is a reference, anything else (function calls, arithmetic,
//!   partial interpolation) is preserved as an opaque function expression.
//! - `depends_on` entries are address strings like `aws_iam_role.role_a`;
//!   the resource-name component becomes the IR dependency, and the
//!   original addresses ride along in the `terraform.depends_on`
//!   annotation for any consumer that wants them.
//! - Top-level blocks this parser does not model (`provider`, `locals`,
//!   `data`, ...) are preserved as opaque nodes with a warning, never
//!   dropped silently.
//! - JSON `null` has no IR equivalent; null-valued entries are dropped
//!   with a warning naming the key.

use serde_json::Value as JsonValue;

use crate::ir::{
    Document, Expression, Metadata, ModuleCall, Node, OpaqueNode, Output, Properties, Resource,
    SourceLocation, Value, Variable,
};
use crate::plugin::{Diagnostic, ParseContext, ParseResult, Parser, SyntaxReport};

/// Parser for Terraform's JSON configuration syntax.
pub struct TerraformParser;

impl Parser for TerraformParser {
    fn language_name(&self) -> &str {
        "terraform"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tf.json"]
    }

    fn parse(&self, source: &str, ctx: &ParseContext) -> ParseResult {
        let file = ctx
            .file_path
            .as_ref()
            .map(|p| p.display().to_string());

        let root: JsonValue = match serde_json::from_str(source) {
            Ok(root) => root,
            Err(err) => {
                return ParseResult::failure(vec![syntax_diagnostic(&err, file.as_deref())]);
            }
        };

        let JsonValue::Object(blocks) = root else {
            return ParseResult::failure(vec![Diagnostic::error(
                "top-level value must be an object of configuration blocks",
            )]);
        };

        let mut document = Document::new();
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (block_kind, body) in &blocks {
            match block_kind.as_str() {
                "resource" => {
                    parse_resources(body, &mut document, &mut errors, &mut warnings);
                }
                "variable" => {
                    parse_variables(body, &mut document, &mut errors, &mut warnings);
                }
                "output" => parse_outputs(body, &mut document, &mut errors, &mut warnings),
                "module" => parse_modules(body, &mut document, &mut errors, &mut warnings),
                other => {
                    // Unknown block kinds are carried through opaquely.
                    document.extras.push(Node::Opaque(OpaqueNode::new(
                        other,
                        json_to_value_lossy(body),
                    )));
                    warnings.push(Diagnostic::warning(format!(
                        "unrecognized top-level block '{}' preserved as an opaque node",
                        other
                    )));
                }
            }
        }

        // Uniqueness and reference problems are validation findings, not
        // parse failures: the IR represents them and the warnings say so.
        for name in document.duplicate_resource_names() {
            warnings.push(Diagnostic::warning(format!(
                "resource name '{}' is declared more than once",
                name
            )));
        }
        for (resource, dependency) in document.dangling_dependencies() {
            warnings.push(Diagnostic::warning(format!(
                "resource '{}' depends on '{}', which is not declared in this document",
                resource, dependency
            )));
        }

        if !errors.is_empty() {
            let mut result = ParseResult::failure(errors);
            result.warnings = warnings;
            return result;
        }

        let mut result = ParseResult::success(document);
        result.warnings = warnings;
        result
    }

    fn validate_syntax(&self, source: &str) -> SyntaxReport {
        match serde_json::from_str::<JsonValue>(source) {
            Ok(JsonValue::Object(_)) => SyntaxReport::clean(),
            Ok(_) => SyntaxReport::invalid(vec![Diagnostic::error(
                "top-level value must be an object of configuration blocks",
            )
            .with_location(SourceLocation::new(1, 1))]),
            Err(err) => SyntaxReport::invalid(vec![syntax_diagnostic(&err, None)]),
        }
    }
}

fn syntax_diagnostic(err: &serde_json::Error, file: Option<&str>) -> Diagnostic {
    let mut location = SourceLocation::new(err.line() as u32, err.column() as u32);
    if let Some(file) = file {
        location = location.with_file(file);
    }
    Diagnostic::error(format!("JSON syntax error: {}", err)).with_location(location)
}

// ============================================================================
// Block parsing
// ============================================================================

fn parse_resources(
    body: &JsonValue,
    document: &mut Document,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let Some(types) = body.as_object() else {
        errors.push(Diagnostic::error(
            "'resource' block must be an object keyed by resource type",
        ));
        return;
    };

    for (resource_type, named) in types {
        let Some(named) = named.as_object() else {
            errors.push(Diagnostic::error(format!(
                "resource type '{}' must hold an object keyed by resource name",
                resource_type
            )));
            continue;
        };

        for (name, block) in named {
            let Some(block) = block.as_object() else {
                errors.push(Diagnostic::error(format!(
                    "resource '{}.{}' must be an object",
                    resource_type, name
                )));
                continue;
            };

            let mut resource = Resource::new(resource_type, name);
            for (key, raw) in block {
                if key == "depends_on" {
                    parse_depends_on(raw, &mut resource, warnings);
                    continue;
                }
                match json_to_value(raw) {
                    Some(value) => {
                        resource.properties.insert(key.clone(), value);
                    }
                    None => warnings.push(null_dropped(&format!(
                        "resource '{}.{}' property '{}'",
                        resource_type, name, key
                    ))),
                }
            }
            document.resources.push(resource);
        }
    }
}

fn parse_depends_on(raw: &JsonValue, resource: &mut Resource, warnings: &mut Vec<Diagnostic>) {
    let Some(entries) = raw.as_array() else {
        warnings.push(Diagnostic::warning(format!(
            "resource '{}' has a non-list depends_on; ignored",
            resource.name
        )));
        return;
    };

    let mut addresses = Vec::new();
    for entry in entries {
        let Some(address) = entry.as_str() else {
            warnings.push(Diagnostic::warning(format!(
                "resource '{}' has a non-string depends_on entry; ignored",
                resource.name
            )));
            continue;
        };
        // `aws_iam_role.role_a` -> dependency on the resource named
        // `role_a`; a bare name is taken as-is.
        let name = address.rsplit('.').next().unwrap_or(address);
        resource.depends_on.push(name.to_string());
        addresses.push(Value::from(address));
    }

    if !addresses.is_empty() {
        resource.meta = std::mem::take(&mut resource.meta)
            .with_annotation("terraform.depends_on", Value::List(addresses));
    }
}

fn parse_variables(
    body: &JsonValue,
    document: &mut Document,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let Some(named) = body.as_object() else {
        errors.push(Diagnostic::error(
            "'variable' block must be an object keyed by variable name",
        ));
        return;
    };

    for (name, block) in named {
        let Some(block) = block.as_object() else {
            errors.push(Diagnostic::error(format!(
                "variable '{}' must be an object",
                name
            )));
            continue;
        };

        let value_type = block
            .get("type")
            .and_then(JsonValue::as_str)
            .unwrap_or("string");
        let mut variable = Variable::new(name, value_type);

        if let Some(default) = block.get("default") {
            match json_to_value(default) {
                Some(value) => variable.default_value = Some(value),
                None => warnings.push(null_dropped(&format!("variable '{}' default", name))),
            }
        }
        if let Some(description) = block.get("description").and_then(JsonValue::as_str) {
            variable.description = Some(description.to_string());
        }

        // Anything else (sensitive, validation, ...) rides along opaquely.
        let mut meta = Metadata::new();
        for (key, raw) in block {
            if matches!(key.as_str(), "type" | "default" | "description") {
                continue;
            }
            if let Some(value) = json_to_value(raw) {
                meta = meta.with_annotation(format!("terraform.{}", key), value);
            }
        }
        variable.meta = meta;

        document.variables.push(variable);
    }
}

fn parse_outputs(
    body: &JsonValue,
    document: &mut Document,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let Some(named) = body.as_object() else {
        errors.push(Diagnostic::error(
            "'output' block must be an object keyed by output name",
        ));
        return;
    };

    for (name, block) in named {
        let Some(block) = block.as_object() else {
            errors.push(Diagnostic::error(format!(
                "output '{}' must be an object",
                name
            )));
            continue;
        };

        let Some(raw_value) = block.get("value") else {
            errors.push(Diagnostic::error(format!(
                "output '{}' is missing its 'value' attribute",
                name
            )));
            continue;
        };

        let value = match json_to_value(raw_value) {
            Some(Value::Expr(expression)) => expression,
            Some(other) => Expression::literal(other),
            None => {
                warnings.push(null_dropped(&format!("output '{}' value", name)));
                continue;
            }
        };

        let mut output = Output::new(name, value);
        if let Some(description) = block.get("description").and_then(JsonValue::as_str) {
            output.description = Some(description.to_string());
        }
        document.outputs.push(output);
    }
}

fn parse_modules(
    body: &JsonValue,
    document: &mut Document,
    errors: &mut Vec<Diagnostic>,
    warnings: &mut Vec<Diagnostic>,
) {
    let Some(named) = body.as_object() else {
        errors.push(Diagnostic::error(
            "'module' block must be an object keyed by module name",
        ));
        return;
    };

    for (name, block) in named {
        let Some(block) = block.as_object() else {
            errors.push(Diagnostic::error(format!(
                "module '{}' must be an object",
                name
            )));
            continue;
        };

        let Some(source) = block.get("source").and_then(JsonValue::as_str) else {
            // A module call without a source cannot be modeled; keep the
            // raw block around instead of losing it.
            document.extras.push(Node::Opaque(OpaqueNode::new(
                "module",
                json_to_value_lossy(&JsonValue::Object(block.clone())),
            )));
            warnings.push(Diagnostic::warning(format!(
                "module '{}' has no 'source'; preserved as an opaque node",
                name
            )));
            continue;
        };

        let mut module = ModuleCall::new(name, source);
        for (key, raw) in block {
            if key == "source" {
                continue;
            }
            match json_to_value(raw) {
                Some(value) => {
                    module.inputs.insert(key.clone(), value);
                }
                None => warnings.push(null_dropped(&format!(
                    "module '{}' input '{}'",
                    name, key
                ))),
            }
        }
        document.modules.push(module);
    }
}

fn null_dropped(context: &str) -> Diagnostic {
    Diagnostic::warning(format!("{} is null and has no IR equivalent; dropped", context))
}

// ============================================================================
// Value conversion
// ============================================================================

/// Converts a JSON value to an IR value. `None` means JSON `null`, which
/// the IR has no variant for.
fn json_to_value(raw: &JsonValue) -> Option<Value> {
    match raw {
        JsonValue::Null => None,
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => n.as_f64().map(Value::Number),
        JsonValue::String(s) => Some(classify_string(s)),
        JsonValue::Array(items) => Some(Value::List(
            items.iter().filter_map(json_to_value).collect(),
        )),
        JsonValue::Object(entries) => {
            let mut map = Properties::new();
            for (key, value) in entries {
                if let Some(value) = json_to_value(value) {
                    map.insert(key.clone(), value);
                }
            }
            Some(Value::Map(map))
        }
    }
}

/// Like [`json_to_value`], but maps `null` to an empty map so whole
/// opaque payloads are never lost.
fn json_to_value_lossy(raw: &JsonValue) -> Value {
    json_to_value(raw).unwrap_or_else(|| Value::Map(Properties::new()))
}

/// Classifies a source string: interpolation syntax becomes an
/// expression, anything else stays a plain string literal.
fn classify_string(s: &str) -> Value {
    if let Some(inner) = s.strip_prefix("${").and_then(|rest| rest.strip_suffix('}')) {
        if !inner.contains("${") {
            if is_reference_path(inner) {
                return Value::Expr(Expression::reference(inner));
            }
            return Value::Expr(Expression::function(s));
        }
    }
    if s.contains("${") {
        // Partial interpolation ("arn:${var.x}:...") cannot be expressed
        // as a plain reference; keep the whole template opaque.
        return Value::Expr(Expression::function(s));
    }
    Value::String(s.to_string())
}

fn is_reference_path(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '*')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ExprKind;

    fn parse(source: &str) -> ParseResult {
        TerraformParser.parse(source, &ParseContext::default())
    }

    const BUCKET_SOURCE: &str = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {
                    "bucket": "my-test-bucket",
                    "acl": "private",
                    "depends_on": ["aws_iam_role.role_a"]
                }
            },
            "aws_iam_role": {
                "role_a": {
                    "name": "uploader"
                }
            }
        }
    }"#;

    #[test]
    fn parses_a_single_resource_block() {
        let result = parse(BUCKET_SOURCE);
        assert!(result.is_success(), "errors: {:?}", result.errors);

        let document = result.document.expect("document");
        assert_eq!(document.resources.len(), 2);

        let bucket = document.resource("assets").expect("assets resource");
        assert_eq!(bucket.resource_type, "aws_s3_bucket");
        assert_eq!(
            bucket.properties.get("bucket"),
            Some(&Value::String("my-test-bucket".into()))
        );
        assert_eq!(
            bucket.properties.get("acl"),
            Some(&Value::String("private".into()))
        );
        assert!(!bucket.properties.contains_key("depends_on"));
    }

    #[test]
    fn depends_on_addresses_reduce_to_resource_names() {
        let result = parse(BUCKET_SOURCE);
        let document = result.document.expect("document");

        let bucket = document.resource("assets").expect("assets resource");
        assert_eq!(bucket.depends_on, vec!["role_a"]);

        // Original addresses are annotated for pass-through consumers.
        assert!(bucket.meta.annotations.contains_key("terraform.depends_on"));
    }

    #[test]
    fn parses_variables_outputs_and_modules() {
        let source = r#"{
            "variable": {
                "region": {
                    "type": "string",
                    "default": "us-east-1",
                    "description": "Deployment region"
                }
            },
            "output": {
                "bucket_name": {
                    "value": "${aws_s3_bucket.assets.bucket}"
                }
            },
            "module": {
                "network": {
                    "source": "./modules/network",
                    "cidr": "10.0.0.0/16"
                }
            }
        }"#;

        let result = parse(source);
        assert!(result.is_success(), "errors: {:?}", result.errors);
        let document = result.document.expect("document");

        assert_eq!(document.variables.len(), 1);
        let region = &document.variables[0];
        assert_eq!(region.value_type, "string");
        assert_eq!(region.default_value, Some(Value::String("us-east-1".into())));
        assert_eq!(region.description.as_deref(), Some("Deployment region"));

        assert_eq!(document.outputs.len(), 1);
        assert_eq!(document.outputs[0].value.kind, ExprKind::Reference);

        assert_eq!(document.modules.len(), 1);
        let network = &document.modules[0];
        assert_eq!(network.source, "./modules/network");
        assert_eq!(
            network.inputs.get("cidr"),
            Some(&Value::String("10.0.0.0/16".into()))
        );
    }

    #[test]
    fn interpolation_strings_become_expressions() {
        assert_eq!(
            classify_string("${var.region}"),
            Value::Expr(Expression::reference("var.region"))
        );
        assert_eq!(
            classify_string("${upper(var.region)}"),
            Value::Expr(Expression::function("${upper(var.region)}"))
        );
        assert_eq!(
            classify_string("arn:${var.partition}:s3"),
            Value::Expr(Expression::function("arn:${var.partition}:s3"))
        );
        assert_eq!(
            classify_string("plain string"),
            Value::String("plain string".into())
        );
    }

    #[test]
    fn unknown_top_level_blocks_are_preserved_opaquely() {
        let source = r#"{"locals": {"env": "prod"}}"#;
        let result = parse(source);

        assert!(result.is_success());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("locals"));

        let document = result.document.expect("document");
        assert_eq!(document.extras.len(), 1);
        let Node::Opaque(opaque) = &document.extras[0] else {
            panic!("expected an opaque node");
        };
        assert_eq!(opaque.original_kind, "locals");
    }

    #[test]
    fn dangling_dependency_is_a_warning_not_an_error() {
        let source = r#"{
            "resource": {
                "aws_s3_bucket": {
                    "assets": {"depends_on": ["aws_iam_role.phantom"]}
                }
            }
        }"#;

        let result = parse(source);
        assert!(result.is_success());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.message.contains("phantom")));
    }

    #[test]
    fn null_values_are_dropped_with_a_warning() {
        let source = r#"{
            "resource": {
                "aws_s3_bucket": {"assets": {"acl": null}}
            }
        }"#;

        let result = parse(source);
        assert!(result.is_success());
        assert!(result.warnings.iter().any(|w| w.message.contains("null")));

        let document = result.document.expect("document");
        let bucket = document.resource("assets").expect("assets");
        assert!(!bucket.properties.contains_key("acl"));
    }

    #[test]
    fn malformed_json_fails_with_a_location() {
        let result = parse("{\n  \"resource\": {\n");

        assert!(!result.is_success());
        assert!(result.document.is_none());
        let location = result.errors[0].location.as_ref().expect("location");
        assert!(location.line >= 2);
    }

    #[test]
    fn parse_never_panics_on_hostile_input() {
        for source in ["", "[]", "42", "\"x\"", "{\"resource\": 7}", "}{", "\u{0}"] {
            let _ = parse(source);
        }
    }

    #[test]
    fn validate_syntax_reports_mismatched_delimiters() {
        let report = TerraformParser.validate_syntax("{\n  \"resource\": {\n}");

        assert!(!report.is_valid());
        let location = report.errors[0].location.as_ref().expect("location");
        assert!(location.line > 0 && location.column > 0);
    }

    #[test]
    fn validate_syntax_accepts_well_formed_documents() {
        assert!(TerraformParser.validate_syntax(BUCKET_SOURCE).is_valid());
    }
}
