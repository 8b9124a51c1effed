//! End-to-end translation scenarios through the library API.
//!
//! These tests drive the full stack - registry, engine, reference
//! plugins, mapping engine - the way an embedding application would.

use std::sync::Arc;

use panconfig::engine::{Phase, TranslateOptions, TranslationEngine};
use panconfig::ir::Document;
use panconfig::languages;
use panconfig::plugin::{GenerateContext, GenerateResult, Generator, PluginRegistry};

fn builtin_registry() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    languages::register_builtin(&mut registry).expect("builtin registration");
    registry
}

#[test]
fn bucket_block_translates_with_mapped_property_names() {
    let source = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {
                    "bucket": "my-test-bucket",
                    "acl": "private"
                }
            }
        }
    }"#;

    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);
    let outcome = engine.translate(
        source,
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );

    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    // Exactly one resource, named as declared.
    let document = outcome.document.as_ref().expect("document");
    assert_eq!(document.resources.len(), 1);
    assert_eq!(document.resources[0].name, "assets");
    assert!(document.resources[0].depends_on.is_empty());

    let output = outcome.output.as_deref().expect("output");
    assert!(output.contains("BucketName: my-test-bucket"), "{}", output);
    assert!(output.contains("AccessControl: private"), "{}", output);
}

#[test]
fn depends_on_produces_an_ordering_marker_with_transformed_name() {
    let source = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {
                    "bucket": "my-test-bucket",
                    "depends_on": ["aws_iam_role.role_a"]
                }
            },
            "aws_iam_role": {
                "role_a": {"name": "uploader"}
            }
        }
    }"#;

    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);
    let outcome = engine.translate(
        source,
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );

    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);

    let output = outcome.output.as_deref().expect("output");
    let depends_index = output.find("DependsOn").expect("DependsOn marker");
    assert!(
        output[depends_index..].contains("RoleA"),
        "ordering marker must reference role_a's transformed name: {}",
        output
    );
}

#[test]
fn validation_only_mode_reports_locations_and_never_generates() {
    // A generator that would fail the test if touched.
    struct PanickingGenerator;

    impl Generator for PanickingGenerator {
        fn language_name(&self) -> &str {
            "cloudformation"
        }

        fn file_extension(&self) -> &str {
            "yaml"
        }

        fn generate(&self, _document: &Document, _ctx: &GenerateContext) -> GenerateResult {
            panic!("validation-only mode must never call a generator");
        }

        fn format_output(&self, _output: &str) -> String {
            panic!("validation-only mode must never call a generator");
        }
    }

    let mut registry = builtin_registry();
    registry
        .register_generator(Arc::new(PanickingGenerator))
        .expect("register");
    let engine = TranslationEngine::new(&registry);

    // Mismatched nesting delimiters.
    let report = engine.validate("{\n  \"resource\": {\n]", "terraform");

    assert!(!report.is_valid());
    let location = report.issues[0].location.as_ref().expect("location");
    assert!(location.line > 0);
    assert!(location.column > 0);
}

#[test]
fn unmappable_construct_degrades_to_a_generate_warning() {
    let source = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {"bucket": "my-test-bucket"}
            },
            "vendor_custom_widget": {
                "widget": {"size": 3}
            }
        }
    }"#;

    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);
    let outcome = engine.translate(
        source,
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );

    // The mappable remainder still translates.
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
    let output = outcome.output.as_deref().expect("output");
    assert!(output.contains("BucketName: my-test-bucket"), "{}", output);

    // The unmappable construct shows up as a generate-phase warning
    // referencing its feature name.
    let warning = outcome
        .warnings
        .iter()
        .find(|w| w.message.contains("vendor_custom_widget"))
        .expect("unsupported-type warning");
    assert_eq!(warning.phase, Phase::Generate);

    // And its properties survive verbatim.
    assert!(output.contains("size: 3"), "{}", output);
}

#[test]
fn success_never_comes_with_empty_output() {
    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);

    for source in ["{}", r#"{"variable": {"x": {"type": "string"}}}"#] {
        let outcome = engine.translate(
            source,
            "terraform",
            "cloudformation",
            &TranslateOptions::default(),
        );
        if outcome.is_success() {
            assert!(
                !outcome.output.as_deref().unwrap_or("").is_empty(),
                "success with empty output for {:?}",
                source
            );
        } else {
            assert!(!outcome.errors.is_empty(), "failure without errors");
        }
    }
}

#[test]
fn terraform_chains_through_ir_json_to_cloudformation() {
    let source = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {"bucket": "my-test-bucket", "acl": "private"}
            }
        }
    }"#;

    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);

    // Leg one: terraform -> ir-json.
    let first = engine.translate(source, "terraform", "ir-json", &TranslateOptions::default());
    assert!(first.is_success(), "errors: {:?}", first.errors);

    // Leg two: ir-json -> cloudformation. The mapping engine keys on the
    // immediate source language, so the terraform mappings do not apply;
    // the shape passes through and is flagged instead.
    let second = engine.translate(
        first.output.as_deref().expect("ir json"),
        "ir-json",
        "cloudformation",
        &TranslateOptions::default(),
    );
    assert!(second.is_success(), "errors: {:?}", second.errors);

    let output = second.output.as_deref().expect("output");
    assert!(output.contains("bucket: my-test-bucket"), "{}", output);
    assert!(second
        .warnings
        .iter()
        .any(|w| w.message.contains("aws_s3_bucket")));
}

#[test]
fn validate_before_skips_translation_for_malformed_source() {
    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);

    let options = TranslateOptions {
        validate_before: true,
        ..Default::default()
    };
    let outcome = engine.translate("{\n  ]", "terraform", "cloudformation", &options);

    assert!(!outcome.is_success());
    assert!(outcome.errors.iter().all(|e| e.phase == Phase::Validate));
    assert!(outcome.document.is_none());
    assert!(outcome.output.is_none());
}

#[test]
fn replacement_plugin_takes_over_translation() {
    // A generator that renders nothing useful, registered over the
    // builtin cloudformation generator: latest registration must win.
    struct StubGenerator;

    impl Generator for StubGenerator {
        fn language_name(&self) -> &str {
            "cloudformation"
        }

        fn file_extension(&self) -> &str {
            "yaml"
        }

        fn generate(&self, _document: &Document, _ctx: &GenerateContext) -> GenerateResult {
            GenerateResult::success("stub: true\n")
        }

        fn format_output(&self, output: &str) -> String {
            output.to_string()
        }
    }

    let mut registry = builtin_registry();
    let replaced = registry
        .register_generator(Arc::new(StubGenerator))
        .expect("register");
    assert!(replaced.is_some(), "builtin generator should be returned");

    let engine = TranslationEngine::new(&registry);
    let outcome = engine.translate(
        "{}",
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );

    assert_eq!(outcome.output.as_deref(), Some("stub: true\n"));
}

#[test]
fn parse_failure_collects_errors_without_generating() {
    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);

    let outcome = engine.translate(
        r#"{"resource": 7, "output": 9}"#,
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );

    assert!(!outcome.is_success());
    // Both malformed blocks are reported, not just the first.
    assert!(outcome.errors.len() >= 2, "errors: {:?}", outcome.errors);
    assert!(outcome.errors.iter().all(|e| e.phase == Phase::Parse));
    assert!(outcome.output.is_none());
}

#[test]
fn annotations_pass_through_unknown_consumers_without_failure() {
    // Documents with plugin-specific annotations must translate cleanly
    // through a generator that knows nothing about them.
    let source = r#"{
        "resource": {
            "aws_s3_bucket": {
                "assets": {
                    "bucket": "b",
                    "depends_on": ["aws_iam_role.role_a"]
                }
            },
            "aws_iam_role": {
                "role_a": {}
            }
        }
    }"#;

    let registry = builtin_registry();
    let engine = TranslationEngine::new(&registry);

    // terraform stamps a `terraform.depends_on` annotation; ir-json must
    // carry it and cloudformation must not choke on it.
    let ir = engine.translate(source, "terraform", "ir-json", &TranslateOptions::default());
    assert!(ir.is_success());
    assert!(ir
        .output
        .as_deref()
        .expect("ir output")
        .contains("terraform.depends_on"));

    let outcome = engine.translate(
        source,
        "terraform",
        "cloudformation",
        &TranslateOptions::default(),
    );
    assert!(outcome.is_success(), "errors: {:?}", outcome.errors);
}
