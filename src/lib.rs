//! Panconfig: The universal infrastructure configuration translator.
//!
//! Panconfig converts between declarative infrastructure configuration
//! languages, similar to how Pandoc converts between document formats. It
//! uses an intermediate representation (IR) to enable N×M language
//! translations with only N parsers and M generators.
//!
//! # Modules
//!
//! - [`ir`]: Intermediate representation types (Document, Resource, Value, etc.)
//! - [`plugin`]: Parser/Generator plugin contracts and the plugin registry
//! - [`mapping`]: Resource-type and property mapping between language pairs
//! - [`engine`]: The translation engine orchestrating parse/validate/generate
//! - [`languages`]: Reference plugins (terraform, cloudformation, ir-json)
//! - [`error`]: Error types for panconfig operations

pub mod engine;
pub mod error;
pub mod ir;
pub mod languages;
pub mod mapping;
pub mod plugin;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use engine::{TranslateOptions, TranslationEngine};
use plugin::PluginRegistry;

pub use error::PanconfigError;

/// The panconfig CLI application.
#[derive(Parser)]
#[command(name = "panconfig")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Translate a configuration from one language to another.
    Translate(TranslateArgs),

    /// Check a source for syntax errors without translating it.
    Validate(ValidateArgs),

    /// List the registered languages and their capabilities.
    Languages,
}

/// Arguments for the translate subcommand.
#[derive(clap::Args)]
struct TranslateArgs {
    /// Input file to translate.
    input: PathBuf,

    /// Source language ('terraform' or 'ir-json').
    #[arg(long)]
    from: String,

    /// Target language ('cloudformation' or 'ir-json').
    #[arg(long)]
    to: String,

    /// Write output to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Run the parser's syntax validation before translating.
    #[arg(long)]
    validate: bool,

    /// Pass the output through the generator's formatter.
    #[arg(long)]
    format: bool,

    /// Report format for diagnostics ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Input file to validate.
    input: PathBuf,

    /// Language to validate against ('terraform' or 'ir-json').
    #[arg(long, default_value = "terraform")]
    language: String,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

/// Run the panconfig CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), PanconfigError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Translate(args)) => run_translate(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Languages) => run_languages(),
        None => {
            // No subcommand: just print help hint and exit successfully
            println!("panconfig {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("The universal infrastructure configuration translator.");
            println!();
            println!("Run 'panconfig --help' for usage information.");
            Ok(())
        }
    }
}

/// Builds the registry with every built-in plugin registered.
fn builtin_registry() -> Result<PluginRegistry, PanconfigError> {
    let mut registry = PluginRegistry::new();
    languages::register_builtin(&mut registry)?;
    Ok(registry)
}

/// Execute the translate subcommand.
fn run_translate(args: TranslateArgs) -> Result<(), PanconfigError> {
    let source = fs::read_to_string(&args.input)?;

    let registry = builtin_registry()?;
    let engine = TranslationEngine::new(&registry);

    let options = TranslateOptions {
        validate_before: args.validate,
        format_output: args.format,
        file_path: Some(args.input.clone()),
        ..Default::default()
    };
    let outcome = engine.translate(&source, &args.from, &args.to, &options);

    match args.report.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        "text" => {
            for warning in &outcome.warnings {
                eprintln!("{}", warning);
            }
            for error in &outcome.errors {
                eprintln!("{}", error);
            }

            if let Some(output) = &outcome.output {
                match &args.out {
                    Some(path) => fs::write(path, output)?,
                    None => print!("{}", output),
                }
            }
        }
        other => {
            return Err(PanconfigError::UnsupportedReportFormat(other.to_string()));
        }
    }

    if outcome.is_success() {
        Ok(())
    } else {
        Err(PanconfigError::TranslationFailed {
            from: args.from,
            to: args.to,
            error_count: outcome.error_count(),
        })
    }
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), PanconfigError> {
    let source = fs::read_to_string(&args.input)?;

    let registry = builtin_registry()?;
    let engine = TranslationEngine::new(&registry);

    let report = engine.validate(&source, &args.language);

    match args.report.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" => print!("{}", report),
        other => {
            return Err(PanconfigError::UnsupportedReportFormat(other.to_string()));
        }
    }

    if report.is_valid() {
        Ok(())
    } else {
        Err(PanconfigError::ValidationFailed {
            error_count: report.error_count(),
        })
    }
}

/// Execute the languages subcommand.
fn run_languages() -> Result<(), PanconfigError> {
    let registry = builtin_registry()?;
    let engine = TranslationEngine::new(&registry);

    for language in engine.supported_languages() {
        let capability = match (language.can_parse, language.can_generate) {
            (true, true) => "parse, generate",
            (true, false) => "parse",
            (false, true) => "generate",
            (false, false) => "none",
        };

        let mut extensions = Vec::new();
        if !language.source_extensions.is_empty() {
            extensions.push(format!("reads .{}", language.source_extensions.join(", .")));
        }
        if let Some(target) = &language.target_extension {
            extensions.push(format!("writes .{}", target));
        }

        println!(
            "{:<16} {:<16} {}",
            language.name,
            capability,
            extensions.join("; ")
        );
    }

    Ok(())
}
