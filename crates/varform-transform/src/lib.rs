//! Variable resolution and declaration emitting.
//!
//! A run is strictly sequential:
//! - [`loader`] reads the exported documents of one project
//! - [`resolve`] names the set owning each variable-set document
//! - [`normalize`] partitions variables by set, sensitivity and environment
//! - [`emit`] renders and writes the declaration files
//!
//! [`pipeline::run`] wires the stages together for a [`RunConfig`](varform_config::RunConfig).

pub mod emit;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod resolve;

pub use error::{TransformError, TransformResult};
pub use normalize::{Buckets, NormalizedModel, Placement};
pub use pipeline::{RunSummary, run};
pub use resolve::ResolvedSet;
