//! One pipeline run: load, resolve, normalize, emit.

use tracing::info;
use varform_config::{OutputMode, RunConfig};

use crate::emit::{self, WrittenFile};
use crate::normalize::{self, DroppedVariable, NormalizedModel};
use crate::{TransformResult, loader, resolve};

/// What a run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub project: String,
    pub sets: usize,
    pub placements: usize,
    pub dropped: Vec<DroppedVariable>,
    pub files: Vec<WrittenFile>,
}

/// Load and normalize the export of the configured project.
pub fn build_model(config: &RunConfig) -> TransformResult<NormalizedModel> {
    let library_sets = loader::load_library_sets(&config.library_sets_dir())?;
    let documents = loader::load_variable_sets(&config.variables_dir())?;
    info!(
        project = %config.project,
        library_sets = library_sets.len(),
        variable_sets = documents.len(),
        "Loaded export"
    );

    let resolved = resolve::resolve_owners(&documents, &library_sets, &config.project)?;
    normalize::normalize(resolved, config.override_order, config.scope_policy)
}

/// Run the whole pipeline for one project.
pub fn run(config: &RunConfig) -> TransformResult<RunSummary> {
    info!(
        project = %config.project,
        mode = %config.mode,
        scope_policy = %config.scope_policy,
        override_order = %config.override_order,
        "********** Variable transform - start **********"
    );

    let model = build_model(config)?;
    let files = match config.mode {
        OutputMode::Fullset => emit::emit_fullset(config, &model)?,
        OutputMode::Legacy => emit::emit_legacy(config, &model)?,
    };

    info!(
        project = %config.project,
        files = files.len(),
        "********** Variable transform - done **********"
    );

    Ok(RunSummary {
        project: config.project.clone(),
        sets: model.set_names().count(),
        placements: model.placements().len(),
        dropped: model.dropped().to_vec(),
        files,
    })
}
