//! CloudFormation (YAML) generator plugin.
//!
//! Renders an IR document as a CloudFormation template: variables become
//! `Parameters`, resources and module calls become `Resources` (module
//! calls as nested `AWS::CloudFormation::Stack` entries), and outputs
//! become `Outputs`. Resource shapes are rewritten through the mapping
//! engine keyed on the document's source language.
//!
//! # Degradation policies
//!
//! - A resource type with no registered mapping is emitted with its
//!   original type tag and an unsupported-feature notice - never dropped.
//! - Function expressions have no general CloudFormation equivalent; the
//!   raw source text is emitted as a string placeholder plus a notice.
//! - Conditional, loop, and opaque nodes are flagged as unsupported; the
//!   rest of the document still renders.
//!
//! Logical IDs are the PascalCase form of IR names (`role_a` -> `RoleA`),
//! applied consistently to resources, parameters, and `DependsOn` markers
//! so references stay coherent.

use serde_yaml::{Mapping, Value as Yaml};

use crate::error::PanconfigError;
use crate::ir::{
    Document, ExprKind, Expression, ModuleCall, Node, Properties, Resource, Value, Variable,
};
use crate::mapping::{MappingEngine, PropertyMapping, ResourceTypeMapping};
use crate::plugin::{Diagnostic, GenerateContext, GenerateResult, Generator, UnsupportedFeature};

const DEFAULT_TEMPLATE_VERSION: &str = "2010-09-09";

/// Generator for CloudFormation YAML templates.
pub struct CloudFormationGenerator {
    mappings: MappingEngine,
}

impl CloudFormationGenerator {
    /// Creates a generator with the built-in Terraform resource mappings.
    ///
    /// # Errors
    /// Returns an error if a built-in mapping path fails to parse; this
    /// indicates a defect in the mapping table, not in caller input.
    pub fn builtin() -> Result<Self, PanconfigError> {
        Ok(Self::with_mappings(builtin_mappings()?))
    }

    /// Creates a generator over a caller-supplied mapping table.
    pub fn with_mappings(mappings: MappingEngine) -> Self {
        Self { mappings }
    }
}

/// The built-in terraform -> cloudformation mapping table.
fn builtin_mappings() -> Result<MappingEngine, PanconfigError> {
    let mut engine = MappingEngine::new();

    engine.register_mapping(
        "terraform",
        "cloudformation",
        ResourceTypeMapping::new("aws_s3_bucket", "AWS::S3::Bucket")
            .with_property(PropertyMapping::renamed("bucket", "BucketName")?)
            .with_property(PropertyMapping::renamed("acl", "AccessControl")?)
            .with_property(
                PropertyMapping::renamed("versioning.enabled", "VersioningConfiguration.Status")?
                    .with_transform(|value| match value {
                        Value::Bool(true) => Value::from("Enabled"),
                        Value::Bool(false) => Value::from("Suspended"),
                        other => other,
                    }),
            )
            .with_property(PropertyMapping::renamed("tags", "Tags")?.with_transform(
                |value| match value {
                    // Terraform tags are a map; CloudFormation wants a
                    // list of Key/Value pairs.
                    Value::Map(entries) => Value::List(
                        entries
                            .into_iter()
                            .map(|(key, value)| {
                                let mut tag = Properties::new();
                                tag.insert("Key".to_string(), Value::from(key));
                                tag.insert("Value".to_string(), value);
                                Value::Map(tag)
                            })
                            .collect(),
                    ),
                    other => other,
                },
            )),
    );

    engine.register_mapping(
        "terraform",
        "cloudformation",
        ResourceTypeMapping::new("aws_iam_role", "AWS::IAM::Role")
            .with_property(PropertyMapping::renamed("name", "RoleName")?)
            .with_property(PropertyMapping::renamed(
                "assume_role_policy",
                "AssumeRolePolicyDocument",
            )?)
            .with_property(PropertyMapping::renamed("path", "Path")?),
    );

    engine.register_mapping(
        "terraform",
        "cloudformation",
        ResourceTypeMapping::new("aws_sqs_queue", "AWS::SQS::Queue")
            .with_property(PropertyMapping::renamed("name", "QueueName")?)
            .with_property(PropertyMapping::renamed(
                "visibility_timeout_seconds",
                "VisibilityTimeout",
            )?)
            .with_property(
                PropertyMapping::renamed("fifo_queue", "FifoQueue")?,
            ),
    );

    Ok(engine)
}

impl Generator for CloudFormationGenerator {
    fn language_name(&self) -> &str {
        "cloudformation"
    }

    fn file_extension(&self) -> &str {
        "yaml"
    }

    fn generate(&self, document: &Document, ctx: &GenerateContext) -> GenerateResult {
        let source_language = ctx.source_language.as_deref().unwrap_or("");
        let mut unsupported = Vec::new();

        let mut template = Mapping::new();
        template.insert(
            yaml_str("AWSTemplateFormatVersion"),
            yaml_str(
                ctx.target_version
                    .as_deref()
                    .unwrap_or(DEFAULT_TEMPLATE_VERSION),
            ),
        );

        if !document.variables.is_empty() {
            let mut parameters = Mapping::new();
            for variable in &document.variables {
                parameters.insert(
                    yaml_str(&logical_id(&variable.name)),
                    render_parameter(variable, &mut unsupported),
                );
            }
            template.insert(yaml_str("Parameters"), Yaml::Mapping(parameters));
        }

        let mut resources = Mapping::new();
        for resource in &document.resources {
            resources.insert(
                yaml_str(&logical_id(&resource.name)),
                self.render_resource(resource, source_language, &mut unsupported),
            );
        }
        for module in &document.modules {
            resources.insert(
                yaml_str(&logical_id(&module.name)),
                render_module(module, &mut unsupported),
            );
        }
        if !resources.is_empty() {
            template.insert(yaml_str("Resources"), Yaml::Mapping(resources));
        }

        if !document.outputs.is_empty() {
            let mut outputs = Mapping::new();
            for output in &document.outputs {
                let mut body = Mapping::new();
                body.insert(
                    yaml_str("Value"),
                    render_expression(&output.value, &mut unsupported),
                );
                if let Some(description) = &output.description {
                    body.insert(yaml_str("Description"), yaml_str(description));
                }
                outputs.insert(yaml_str(&logical_id(&output.name)), Yaml::Mapping(body));
            }
            template.insert(yaml_str("Outputs"), Yaml::Mapping(outputs));
        }

        for node in &document.extras {
            unsupported.push(unsupported_node(node));
        }

        let rendered = match serde_yaml::to_string(&Yaml::Mapping(template)) {
            Ok(rendered) => rendered,
            Err(err) => {
                return GenerateResult::failure(vec![Diagnostic::error(format!(
                    "failed to render YAML template: {}",
                    err
                ))]);
            }
        };

        GenerateResult {
            output: Some(rendered),
            errors: Vec::new(),
            warnings: Vec::new(),
            unsupported_features: unsupported,
        }
    }

    fn format_output(&self, output: &str) -> String {
        let mut formatted: String = output
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");
        while formatted.ends_with('\n') {
            formatted.pop();
        }
        formatted.push('\n');
        formatted
    }
}

impl CloudFormationGenerator {
    fn render_resource(
        &self,
        resource: &Resource,
        source_language: &str,
        unsupported: &mut Vec<UnsupportedFeature>,
    ) -> Yaml {
        let resource_type = match self.mappings.map_resource_type(
            source_language,
            "cloudformation",
            &resource.resource_type,
        ) {
            Some(mapped) => mapped.to_string(),
            None => {
                // Pass-through with a notice: an unmapped type is a known
                // gap, not a failure.
                unsupported.push(UnsupportedFeature::new(
                    format!("resource type '{}'", resource.resource_type),
                    "no cloudformation mapping registered; type emitted unchanged",
                ));
                resource.resource_type.clone()
            }
        };

        let properties = self.mappings.map_properties(
            source_language,
            "cloudformation",
            &resource.resource_type,
            resource.properties.clone(),
        );

        let mut body = Mapping::new();
        body.insert(yaml_str("Type"), yaml_str(&resource_type));
        if !resource.depends_on.is_empty() {
            body.insert(
                yaml_str("DependsOn"),
                Yaml::Sequence(
                    resource
                        .depends_on
                        .iter()
                        .map(|name| yaml_str(&logical_id(name)))
                        .collect(),
                ),
            );
        }
        if !properties.is_empty() {
            body.insert(
                yaml_str("Properties"),
                properties_to_yaml(&properties, unsupported),
            );
        }
        Yaml::Mapping(body)
    }
}

fn render_parameter(variable: &Variable, unsupported: &mut Vec<UnsupportedFeature>) -> Yaml {
    let parameter_type = match variable.value_type.as_str() {
        "string" => "String",
        "number" => "Number",
        "list" | "list(string)" => "CommaDelimitedList",
        other => {
            unsupported.push(UnsupportedFeature::new(
                format!("variable type '{}'", other),
                "no CloudFormation parameter type equivalent; declared as String",
            ));
            "String"
        }
    };

    let mut body = Mapping::new();
    body.insert(yaml_str("Type"), yaml_str(parameter_type));
    if let Some(default) = &variable.default_value {
        body.insert(yaml_str("Default"), value_to_yaml(default, unsupported));
    }
    if let Some(description) = &variable.description {
        body.insert(yaml_str("Description"), yaml_str(description));
    }
    Yaml::Mapping(body)
}

fn render_module(module: &ModuleCall, unsupported: &mut Vec<UnsupportedFeature>) -> Yaml {
    let mut properties = Mapping::new();
    properties.insert(yaml_str("TemplateURL"), yaml_str(&module.source));
    if !module.inputs.is_empty() {
        properties.insert(
            yaml_str("Parameters"),
            properties_to_yaml(&module.inputs, unsupported),
        );
    }

    let mut body = Mapping::new();
    body.insert(yaml_str("Type"), yaml_str("AWS::CloudFormation::Stack"));
    body.insert(yaml_str("Properties"), Yaml::Mapping(properties));
    Yaml::Mapping(body)
}

fn unsupported_node(node: &Node) -> UnsupportedFeature {
    let mut feature = match node {
        Node::Conditional(_) => UnsupportedFeature::new(
            "conditional block",
            "CloudFormation conditions cannot be derived from IR conditionals; block not rendered",
        ),
        Node::Loop(_) => UnsupportedFeature::new(
            "loop block",
            "CloudFormation has no loop construct; block not rendered",
        ),
        Node::Opaque(opaque) => UnsupportedFeature::new(
            format!("node kind '{}'", opaque.original_kind),
            "unrecognized node kind; block not rendered",
        ),
        other => UnsupportedFeature::new(
            format!("nested {} node", other.kind()),
            "top-level collections are the only supported position; block not rendered",
        ),
    };
    if let Some(location) = &node.metadata().location {
        feature = feature.with_location(location.clone());
    }
    feature
}

// ============================================================================
// Value rendering
// ============================================================================

fn properties_to_yaml(properties: &Properties, unsupported: &mut Vec<UnsupportedFeature>) -> Yaml {
    let mut mapping = Mapping::new();
    for (key, value) in properties {
        mapping.insert(yaml_str(key), value_to_yaml(value, unsupported));
    }
    Yaml::Mapping(mapping)
}

fn value_to_yaml(value: &Value, unsupported: &mut Vec<UnsupportedFeature>) -> Yaml {
    match value {
        Value::Bool(b) => Yaml::Bool(*b),
        Value::Number(n) => yaml_number(*n),
        Value::String(s) => yaml_str(s),
        Value::Expr(expression) => render_expression(expression, unsupported),
        Value::List(items) => Yaml::Sequence(
            items
                .iter()
                .map(|item| value_to_yaml(item, unsupported))
                .collect(),
        ),
        Value::Map(map) => properties_to_yaml(map, unsupported),
    }
}

fn render_expression(expression: &Expression, unsupported: &mut Vec<UnsupportedFeature>) -> Yaml {
    match expression.kind {
        ExprKind::Literal => value_to_yaml(&expression.value, unsupported),
        ExprKind::Reference => match expression.value.as_str() {
            Some(path) => render_reference(path),
            None => {
                unsupported.push(UnsupportedFeature::new(
                    "reference expression",
                    "reference payload is not a dotted-path string; emitted as-is",
                ));
                value_to_yaml(&expression.value, unsupported)
            }
        },
        ExprKind::Function => {
            let raw = expression
                .value
                .as_str()
                .unwrap_or("<function expression>")
                .to_string();
            unsupported.push(UnsupportedFeature::new(
                "function expression",
                format!("`{}` has no CloudFormation equivalent; emitted verbatim", raw),
            ));
            Yaml::String(raw)
        }
    }
}

/// Renders a dotted reference path as `Ref` or `Fn::GetAtt`.
///
/// - `var.name` refers to a parameter: `Ref` to its logical ID.
/// - `type.name` refers to a resource: `Ref` to its logical ID.
/// - `type.name.attr...` reads an attribute: `Fn::GetAtt`.
fn render_reference(path: &str) -> Yaml {
    let segments: Vec<&str> = path.split('.').collect();

    let mut mapping = Mapping::new();
    match segments.as_slice() {
        ["var", name] => {
            mapping.insert(yaml_str("Ref"), yaml_str(&logical_id(name)));
        }
        [_, name] | [name] => {
            mapping.insert(yaml_str("Ref"), yaml_str(&logical_id(name)));
        }
        [_, name, attributes @ ..] => {
            mapping.insert(
                yaml_str("Fn::GetAtt"),
                Yaml::Sequence(vec![
                    yaml_str(&logical_id(name)),
                    yaml_str(&attributes.join(".")),
                ]),
            );
        }
        [] => {
            mapping.insert(yaml_str("Ref"), yaml_str(""));
        }
    }
    Yaml::Mapping(mapping)
}

/// PascalCase logical ID for an IR name: `role_a` -> `RoleA`.
fn logical_id(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let mut chars = chunk.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn yaml_str(s: &str) -> Yaml {
    Yaml::String(s.to_string())
}

fn yaml_number(n: f64) -> Yaml {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Yaml::Number((n as i64).into())
    } else {
        Yaml::Number(n.into())
    }
}
