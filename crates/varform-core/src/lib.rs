//! Core domain types for varform.
//!
//! This crate contains:
//! - Owner identifiers and identifier sanitizing
//! - Variable and variable-set documents as exported by the deployment server
//! - The fixed two-environment model and sensitivity classes
//! - Override-order and scope-policy knobs shared by config and transform

pub mod environment;
pub mod error;
pub mod id;
pub mod policy;
pub mod variable;

pub use environment::{Environment, Sensitivity};
pub use error::{Error, Result};
pub use id::{OwnerId, sanitize_identifier};
pub use policy::{OverrideOrder, Overridable, ScopePolicy};
pub use variable::{LibraryVariableSet, Scope, SetOrigin, Variable, VariableSetDocument};
