//! Variable and variable-set documents as exported by the deployment server.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::OwnerId;

/// A single exported variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Variable {
    /// Variable id, when the export carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Opaque value. Sensitive values are usually exported as `null`.
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub value: Option<String>,
    #[serde(default)]
    pub is_sensitive: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scope: Scope,
}

/// Where a variable applies.
///
/// Only environments are routed; other dimensions (roles, machines,
/// channels, ...) are carried but ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(
        rename = "Environment",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_default"
    )]
    pub environment: Vec<String>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

impl Scope {
    /// The environment id used for routing: the first entry only.
    pub fn environment_id(&self) -> Option<&str> {
        self.environment.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.environment.is_empty() && self.other.is_empty()
    }
}

/// A variable-set document: the variables owned by one project or library set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VariableSetDocument {
    pub id: String,
    pub owner_id: OwnerId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Vec<Variable>,
}

/// A shared library variable set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LibraryVariableSet {
    pub id: String,
    pub name: String,
}

/// Whether a set is implicit to the project or a shared library set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOrigin {
    Project,
    Library,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Scalar>::deserialize(deserializer)?;
    Ok(value.map(|scalar| match scalar {
        Scalar::Text(s) => s,
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
