//! The fixed two-environment model and sensitivity classes.
//!
//! Only two deployment targets exist. Source data identifies them by opaque
//! ids; anything else is an unknown scope and is handled by the caller's
//! [`ScopePolicy`](crate::ScopePolicy).

use serde::{Deserialize, Serialize};

/// Source id of the staging environment.
pub const STAGING_ENVIRONMENT_ID: &str = "Environments-1";
/// Source id of the production environment.
pub const PRODUCTION_ENVIRONMENT_ID: &str = "Environments-2";

/// Deployment target.
///
/// Variant order matches the lexicographic order of the emitted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Production, Environment::Staging];

    /// Map a source environment id onto a deployment target.
    pub fn from_source_id(id: &str) -> Option<Self> {
        match id {
            STAGING_ENVIRONMENT_ID => Some(Environment::Staging),
            PRODUCTION_ENVIRONMENT_ID => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sensitivity class of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    Parameters,
    Secrets,
}

impl Sensitivity {
    pub const ALL: [Sensitivity; 2] = [Sensitivity::Parameters, Sensitivity::Secrets];

    pub fn from_flag(is_sensitive: bool) -> Self {
        if is_sensitive {
            Sensitivity::Secrets
        } else {
            Sensitivity::Parameters
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sensitivity::Parameters => "parameters",
            Sensitivity::Secrets => "secrets",
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
