//! Pipeline errors. Every variant aborts the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{} has no '{key}' field", .path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("variable set '{document}' is owned by unknown set '{owner}'")]
    UnresolvedOwner { document: String, owner: String },

    #[error(
        "variable '{variable}' in set '{set}' is scoped to unknown environment '{environment}'"
    )]
    UnknownScope {
        set: String,
        variable: String,
        environment: String,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] varform_config::ConfigError),
}

pub type TransformResult<T> = std::result::Result<T, TransformError>;
