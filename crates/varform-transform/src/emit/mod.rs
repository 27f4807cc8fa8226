//! Declaration file emitting.

pub mod hcl;

use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use varform_config::RunConfig;

use crate::{NormalizedModel, TransformError, TransformResult};

/// A declaration file written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Hex SHA-256 of the bytes written.
    pub digest: String,
    pub bytes: usize,
}

/// Truncate-and-create `path`, creating missing parent directories first.
///
/// A failure part way through leaves whatever was written in place.
pub fn write_declaration(path: &Path, content: &str) -> TransformResult<WrittenFile> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TransformError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let write_err = |source| TransformError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::File::create(path).map_err(write_err)?;
    file.write_all(content.as_bytes()).map_err(write_err)?;
    file.flush().map_err(write_err)?;

    let digest = hex::encode(Sha256::digest(content.as_bytes()));
    info!(path = %path.display(), digest = %digest, "Wrote declaration file");

    Ok(WrittenFile {
        path: path.to_path_buf(),
        digest,
        bytes: content.len(),
    })
}

/// Write the comprehensive file and the set manifest.
pub fn emit_fullset(config: &RunConfig, model: &NormalizedModel) -> TransformResult<Vec<WrittenFile>> {
    let local_name = config.local_name();
    let comprehensive = hcl::render_comprehensive(&local_name, &model.by_type());
    let manifest = hcl::render_manifest(&local_name, model.set_names());

    Ok(vec![
        write_declaration(&config.fullset_path(), &comprehensive)?,
        write_declaration(&config.manifest_path(), &manifest)?,
    ])
}

/// Write per-environment parameter and secret files over the flat view,
/// skipping empty buckets, then the set manifest.
pub fn emit_legacy(config: &RunConfig, model: &NormalizedModel) -> TransformResult<Vec<WrittenFile>> {
    let local_name = config.local_name();
    let mut written = Vec::new();

    for (environment, sensitivities) in model.flattened() {
        for (sensitivity, bucket) in sensitivities {
            if bucket.is_empty() {
                continue;
            }
            let text = hcl::render_scoped(&local_name, environment, &bucket);
            written.push(write_declaration(
                &config.scoped_path(environment, sensitivity),
                &text,
            )?);
        }
    }

    let manifest = hcl::render_manifest(&local_name, model.set_names());
    written.push(write_declaration(&config.manifest_path(), &manifest)?);
    Ok(written)
}
