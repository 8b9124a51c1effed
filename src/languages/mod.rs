//! Reference language plugins.
//!
//! These exercise the plugin contracts end to end: `terraform` registers
//! only a parser and `cloudformation` only a generator (deliberately
//! one-sided, so partial language support is a tested path), while
//! `ir-json` registers both sides as the lossless hub format.

pub mod cloudformation;
pub mod ir_json;
pub mod terraform;

pub use cloudformation::CloudFormationGenerator;
pub use ir_json::{IrJsonGenerator, IrJsonParser};
pub use terraform::TerraformParser;

use std::sync::Arc;

use crate::error::PanconfigError;
use crate::plugin::PluginRegistry;

/// Registers all built-in plugins on a registry.
///
/// # Errors
/// Returns an error if a plugin fails registration validation or a
/// built-in mapping table fails to construct.
pub fn register_builtin(registry: &mut PluginRegistry) -> Result<(), PanconfigError> {
    registry.register_parser(Arc::new(TerraformParser))?;
    registry.register_parser(Arc::new(IrJsonParser))?;
    registry.register_generator(Arc::new(CloudFormationGenerator::builtin()?))?;
    registry.register_generator(Arc::new(IrJsonGenerator))?;
    Ok(())
}
