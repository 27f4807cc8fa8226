//! Owner identifiers.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Owner ids with this prefix belong to a project rather than a library set.
pub const PROJECT_OWNER_PREFIX: &str = "Projects-";

/// Identifier of the entity owning a variable-set document.
///
/// Either a project (`Projects-42`) or a library variable set
/// (`LibraryVariableSets-1`). Ordering is plain string ordering of the raw id.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id follows the project-ownership convention.
    pub fn is_project(&self) -> bool {
        self.0.starts_with(PROJECT_OWNER_PREFIX)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Replace spaces, hyphens and periods with underscores.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '-' | '.' => '_',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_convention() {
        assert!(OwnerId::from("Projects-42").is_project());
        assert!(!OwnerId::from("LibraryVariableSets-1").is_project());
        assert!(!OwnerId::from("projects-42").is_project());
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Shared Config"), "Shared_Config");
        assert_eq!(sanitize_identifier("db-creds.v2"), "db_creds_v2");
        assert_eq!(sanitize_identifier("already_fine"), "already_fine");
    }

    #[test]
    fn test_sanitized_names_have_no_separators() {
        let names = ["a b-c.d", " - . ", "Ops.Team - Shared", "", "x"];
        for name in names {
            let sanitized = sanitize_identifier(name);
            assert!(!sanitized.contains([' ', '-', '.']), "{sanitized}");
            assert_eq!(sanitized.chars().count(), name.chars().count());
        }
    }

    #[test]
    fn test_owner_id_ordering_is_raw_string_order() {
        let mut ids = vec![
            OwnerId::from("Projects-42"),
            OwnerId::from("LibraryVariableSets-10"),
            OwnerId::from("LibraryVariableSets-2"),
        ];
        ids.sort();
        let ids: Vec<_> = ids.iter().map(OwnerId::as_str).collect();
        assert_eq!(
            ids,
            vec!["LibraryVariableSets-10", "LibraryVariableSets-2", "Projects-42"]
        );
    }
}
