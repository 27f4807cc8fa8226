//! Ownership resolution: naming the set that owns each variable-set document.

use std::collections::BTreeMap;
use tracing::debug;
use varform_core::{
    LibraryVariableSet, Overridable, OwnerId, SetOrigin, Variable, VariableSetDocument,
    sanitize_identifier,
};

use crate::{TransformError, TransformResult};

/// Name of the implicit set holding a project's own variables.
pub fn project_set_name(project: &str) -> String {
    sanitize_identifier(&format!("{} Project Specific Variables", project))
}

/// A variable-set document annotated with the name of its owning set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSet {
    pub document_id: String,
    pub owner_id: OwnerId,
    pub origin: SetOrigin,
    /// Sanitized display name of the owning set.
    pub name: String,
    pub variables: Vec<Variable>,
}

impl Overridable for ResolvedSet {
    fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    fn document_id(&self) -> &str {
        &self.document_id
    }
}

/// Resolve the owner of every variable-set document.
///
/// Inputs are left untouched. Output is in document-key order.
pub fn resolve_owners(
    documents: &BTreeMap<String, VariableSetDocument>,
    library_sets: &BTreeMap<String, LibraryVariableSet>,
    project: &str,
) -> TransformResult<Vec<ResolvedSet>> {
    documents
        .iter()
        .map(|(key, doc)| {
            let (origin, display_name) = if doc.owner_id.is_project() {
                (SetOrigin::Project, project_set_name(project))
            } else {
                let set = library_sets.get(doc.owner_id.as_str()).ok_or_else(|| {
                    TransformError::UnresolvedOwner {
                        document: key.clone(),
                        owner: doc.owner_id.to_string(),
                    }
                })?;
                (SetOrigin::Library, set.name.clone())
            };

            let name = sanitize_identifier(&display_name);
            debug!(document = %key, owner = %doc.owner_id, set = %name, "Resolved owner");

            Ok(ResolvedSet {
                document_id: key.clone(),
                owner_id: doc.owner_id.clone(),
                origin,
                name,
                variables: doc.variables.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str, owner: &str) -> (String, VariableSetDocument) {
        (
            id.to_string(),
            VariableSetDocument {
                id: id.to_string(),
                owner_id: OwnerId::from(owner),
                variables: Vec::new(),
            },
        )
    }

    fn library(id: &str, name: &str) -> (String, LibraryVariableSet) {
        (
            id.to_string(),
            LibraryVariableSet {
                id: id.to_string(),
                name: name.to_string(),
            },
        )
    }

    #[test]
    fn test_project_and_library_owners() {
        let documents = BTreeMap::from([
            document("variableset-Projects-42", "Projects-42"),
            document("variableset-LibraryVariableSets-1", "LibraryVariableSets-1"),
        ]);
        let libraries = BTreeMap::from([library("LibraryVariableSets-1", "Shared Config")]);

        let resolved = resolve_owners(&documents, &libraries, "billing").unwrap();
        assert_eq!(resolved.len(), 2);

        assert_eq!(resolved[0].document_id, "variableset-LibraryVariableSets-1");
        assert_eq!(resolved[0].origin, SetOrigin::Library);
        assert_eq!(resolved[0].name, "Shared_Config");

        assert_eq!(resolved[1].origin, SetOrigin::Project);
        assert_eq!(resolved[1].name, "billing_Project_Specific_Variables");
    }

    #[test]
    fn test_unknown_owner_fails() {
        let documents = BTreeMap::from([document("variableset-x", "LibraryVariableSets-9")]);
        let result = resolve_owners(&documents, &BTreeMap::new(), "billing");
        assert!(matches!(
            result.unwrap_err(),
            TransformError::UnresolvedOwner { owner, .. } if owner == "LibraryVariableSets-9"
        ));
    }

    #[test]
    fn test_names_are_sanitized() {
        let documents = BTreeMap::from([
            document("variableset-1", "LibraryVariableSets-1"),
            document("variableset-2", "Projects-7"),
        ]);
        let libraries = BTreeMap::from([library("LibraryVariableSets-1", "Ops.Team - Shared")]);

        let resolved = resolve_owners(&documents, &libraries, "web-api.v2").unwrap();
        for set in &resolved {
            assert!(!set.name.contains([' ', '-', '.']), "{}", set.name);
        }
        assert_eq!(resolved[0].name, "Ops_Team___Shared");
        assert_eq!(resolved[1].name, "web_api_v2_Project_Specific_Variables");
    }

    #[test]
    fn test_project_set_sorts_after_same_prefix_library() {
        let project = project_set_name("Shared Config");
        let library = sanitize_identifier("Shared Config");
        assert!(library < project);
    }

    #[test]
    fn test_inputs_not_mutated() {
        let documents = BTreeMap::from([document("variableset-Projects-1", "Projects-1")]);
        let before = documents.clone();
        resolve_owners(&documents, &BTreeMap::new(), "billing").unwrap();
        assert_eq!(documents, before);
    }
}
