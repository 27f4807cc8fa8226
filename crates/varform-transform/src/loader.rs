//! Document loading from an export directory.

use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use varform_core::{LibraryVariableSet, VariableSetDocument};

use crate::{TransformError, TransformResult};

/// Extension of exported documents. Other files are skipped.
pub const DOCUMENT_EXTENSION: &str = "yaml";
/// Field every exported document is keyed by.
pub const ID_FIELD: &str = "Id";

/// A parsed document and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: PathBuf,
    pub value: Value,
}

/// Load every document in `dir`, keyed by the string value of `key_field`.
///
/// Files are read in file-name order. Stops at the first unreadable or
/// malformed file. When two files carry the same key the later one wins.
pub fn load_documents(dir: &Path, key_field: &str) -> TransformResult<BTreeMap<String, Document>> {
    let read_err = |source| TransformError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = BTreeMap::new();
    for path in paths {
        let content = std::fs::read_to_string(&path).map_err(|source| TransformError::Read {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_yaml::from_str(&content).map_err(|source| TransformError::Parse {
            path: path.clone(),
            source,
        })?;

        let key = match value.get(key_field).and_then(Value::as_str) {
            Some(key) => key.to_string(),
            None => {
                return Err(TransformError::MissingKey {
                    path,
                    key: key_field.to_string(),
                });
            }
        };

        if let Some(previous) = documents.insert(key.clone(), Document { path, value }) {
            warn!(
                key = %key,
                replaced = %previous.path.display(),
                "Duplicate document key, keeping the later file"
            );
        }
    }

    debug!(dir = %dir.display(), count = documents.len(), "Loaded documents");
    Ok(documents)
}

/// Convert loaded documents into a typed form, keeping their keys.
pub fn into_typed<T: DeserializeOwned>(
    documents: BTreeMap<String, Document>,
) -> TransformResult<BTreeMap<String, T>> {
    documents
        .into_iter()
        .map(|(key, doc)| {
            let typed = serde_yaml::from_value(doc.value)
                .map_err(|source| TransformError::Parse { path: doc.path, source })?;
            Ok((key, typed))
        })
        .collect()
}

/// Load the variable-set documents of a project.
pub fn load_variable_sets(dir: &Path) -> TransformResult<BTreeMap<String, VariableSetDocument>> {
    into_typed(load_documents(dir, ID_FIELD)?)
}

/// Load the library variable sets visible to a project.
pub fn load_library_sets(dir: &Path) -> TransformResult<BTreeMap<String, LibraryVariableSet>> {
    into_typed(load_documents(dir, ID_FIELD)?)
}
