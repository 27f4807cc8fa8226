//! `varform.kdl` config-file parsing.
//!
//! ```kdl
//! project "billing"
//! input-directory "/exports/"
//! data-path "/terraform/vars"
//! space "Spaces-1"
//! mode "fullset"
//! scope-policy "lenient"
//! override-order "owner-id"
//! ```

use crate::{ConfigError, ConfigResult, OutputMode};
use kdl::{KdlDocument, KdlNode};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use varform_core::{OverrideOrder, ScopePolicy};

/// Values read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub project: Option<String>,
    pub input_directory: Option<PathBuf>,
    pub data_path: Option<PathBuf>,
    pub space: Option<String>,
    pub mode: Option<OutputMode>,
    pub scope_policy: Option<ScopePolicy>,
    pub override_order: Option<OverrideOrder>,
}

impl ConfigFile {
    /// Read and parse a config file from disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        parse_config_file(&content)
    }
}

/// Parse config-file values from KDL text.
pub fn parse_config_file(kdl: &str) -> ConfigResult<ConfigFile> {
    let doc: KdlDocument = kdl.parse()?;
    let mut file = ConfigFile::default();

    for node in doc.nodes() {
        match node.name().value() {
            "project" => file.project = Some(required_string(node, "project")?),
            "input-directory" => {
                file.input_directory = Some(PathBuf::from(required_string(node, "input-directory")?))
            }
            "data-path" => file.data_path = Some(PathBuf::from(required_string(node, "data-path")?)),
            "space" => file.space = Some(required_string(node, "space")?),
            "mode" => file.mode = Some(required_string(node, "mode")?.parse()?),
            "scope-policy" => file.scope_policy = Some(parse_core_value(node, "scope-policy")?),
            "override-order" => {
                file.override_order = Some(parse_core_value(node, "override-order")?)
            }
            _ => {} // Ignore unknown nodes
        }
    }

    Ok(file)
}

fn parse_core_value<T>(node: &KdlNode, field: &str) -> ConfigResult<T>
where
    T: FromStr<Err = varform_core::Error>,
{
    required_string(node, field)?
        .parse()
        .map_err(|e: varform_core::Error| ConfigError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        })
}

fn required_string(node: &KdlNode, field: &str) -> ConfigResult<String> {
    get_first_string_arg(node).ok_or_else(|| ConfigError::MissingField(format!("{} value", field)))
}

fn get_first_string_arg(node: &KdlNode) -> Option<String> {
    node.entries()
        .iter()
        .find(|e| e.name().is_none())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}
