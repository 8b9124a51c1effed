//! Intermediate Representation (IR) for panconfig.
//!
//! This module defines the canonical, language-agnostic representation of
//! infrastructure configuration documents. It serves as the central "hub"
//! that all translations pass through, so supporting N source and M target
//! languages costs N parsers + M generators rather than N×M translators.
//!
//! # Design Principles
//!
//! 1. **Closed sums, open data**: node kinds and property values are closed
//!    enums so consumer dispatch is exhaustiveness-checked, with explicit
//!    opaque variants ([`Node::Opaque`], annotation maps) so unknown data
//!    flows through rather than being dropped.
//!
//! 2. **Permissive construction**: the IR can represent "invalid" documents
//!    (duplicate resource names, dangling `depends_on` references), so that
//!    validation can report issues instead of parsers panicking.
//!
//! 3. **Deterministic shape**: property maps are ordered (`BTreeMap`) and
//!    dependency lists keep declaration order, so generated output is
//!    stable across runs.
//!
//! # Example
//!
//! ```
//! use panconfig::ir::{Document, Expression, Output, Resource};
//!
//! let document = Document {
//!     resources: vec![
//!         Resource::new("aws_s3_bucket", "assets")
//!             .with_property("bucket", "my-test-bucket")
//!             .with_property("acl", "private"),
//!     ],
//!     outputs: vec![Output::new(
//!         "bucket_name",
//!         Expression::reference("aws_s3_bucket.assets.bucket"),
//!     )],
//!     ..Default::default()
//! };
//! ```

pub mod io_json;
mod metadata;
mod model;
mod path;
mod value;

// Re-export core types for convenient access
pub use metadata::{Metadata, SourceLocation};
pub use model::{
    Conditional, Document, Loop, ModuleCall, Node, NodeKind, OpaqueNode, Output, Resource,
    Variable, SCHEMA_VERSION,
};
pub use path::PropertyPath;
pub use value::{ExprKind, Expression, Properties, Value};
