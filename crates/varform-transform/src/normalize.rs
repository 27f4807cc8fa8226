//! Scope normalization: partitioning variables by set, sensitivity and
//! environment.
//!
//! [`normalize`] makes a single placement pass over the resolved sets in
//! override order. The views consumed by the emitters are folds over that
//! one placement list, so they always agree on resolved values.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use varform_core::{Environment, OverrideOrder, ScopePolicy, Sensitivity, Variable};

use crate::{ResolvedSet, TransformError, TransformResult};

/// Variable name to value within one bucket.
pub type Bucket = BTreeMap<String, Option<String>>;

/// Two levels of keys above a bucket.
pub type Buckets<A, B> = BTreeMap<A, BTreeMap<B, Bucket>>;

/// One variable written into one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub set: String,
    pub sensitivity: Sensitivity,
    pub environment: Environment,
    pub name: String,
    pub value: Option<String>,
}

/// A variable left out because its scope is outside the two-environment model.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedVariable {
    pub set: String,
    pub name: String,
    pub environment: String,
}

/// The normalized result of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedModel {
    /// Distinct set names, sorted.
    set_names: BTreeSet<String>,
    /// Placements in application order.
    placements: Vec<Placement>,
    dropped: Vec<DroppedVariable>,
}

enum Route<'a> {
    Everywhere,
    Only(Environment),
    Unknown(&'a str),
}

fn route(variable: &Variable) -> Route<'_> {
    match variable.scope.environment_id() {
        None => Route::Everywhere,
        Some(id) => match Environment::from_source_id(id) {
            Some(environment) => Route::Only(environment),
            None => Route::Unknown(id),
        },
    }
}

/// Partition every resolved variable into its buckets.
///
/// Sets are applied in `order`; within a bucket a later set overwrites an
/// earlier one's value for the same name.
pub fn normalize(
    mut sets: Vec<ResolvedSet>,
    order: OverrideOrder,
    policy: ScopePolicy,
) -> TransformResult<NormalizedModel> {
    order.sort(&mut sets);

    let mut model = NormalizedModel::default();
    for set in sets {
        model.set_names.insert(set.name.clone());

        for variable in set.variables {
            let sensitivity = Sensitivity::from_flag(variable.is_sensitive);
            let environments: &[Environment] = match route(&variable) {
                Route::Everywhere => {
                    if !variable.scope.other.is_empty() {
                        debug!(
                            set = %set.name,
                            variable = %variable.name,
                            "Ignoring non-environment scope"
                        );
                    }
                    &Environment::ALL
                }
                Route::Only(Environment::Staging) => &[Environment::Staging],
                Route::Only(Environment::Production) => &[Environment::Production],
                Route::Unknown(id) => {
                    if policy == ScopePolicy::Strict {
                        return Err(TransformError::UnknownScope {
                            set: set.name.clone(),
                            variable: variable.name.clone(),
                            environment: id.to_string(),
                        });
                    }
                    warn!(
                        set = %set.name,
                        variable = %variable.name,
                        environment = %id,
                        "Unknown environment, dropping variable"
                    );
                    model.dropped.push(DroppedVariable {
                        set: set.name.clone(),
                        name: variable.name.clone(),
                        environment: id.to_string(),
                    });
                    continue;
                }
            };

            for &environment in environments {
                model.placements.push(Placement {
                    set: set.name.clone(),
                    sensitivity,
                    environment,
                    name: variable.name.clone(),
                    value: variable.value.clone(),
                });
            }
        }
    }

    debug!(
        sets = model.set_names.len(),
        placements = model.placements.len(),
        dropped = model.dropped.len(),
        "Normalized variables"
    );
    Ok(model)
}

impl NormalizedModel {
    /// Distinct owning-set names, sorted.
    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.set_names.iter().map(String::as_str)
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn dropped(&self) -> &[DroppedVariable] {
        &self.dropped
    }

    /// `{set: {sensitivity: {environment: {name: value}}}}`
    ///
    /// Every set carries all four buckets, empty or not.
    pub fn by_type(&self) -> BTreeMap<String, Buckets<Sensitivity, Environment>> {
        let mut view: BTreeMap<String, Buckets<Sensitivity, Environment>> = self
            .set_names
            .iter()
            .map(|name| (name.clone(), empty_buckets(&Sensitivity::ALL, &Environment::ALL)))
            .collect();
        for p in &self.placements {
            view.entry(p.set.clone())
                .or_default()
                .entry(p.sensitivity)
                .or_default()
                .entry(p.environment)
                .or_default()
                .insert(p.name.clone(), p.value.clone());
        }
        view
    }

    /// `{set: {environment: {sensitivity: {name: value}}}}`
    pub fn by_environment(&self) -> BTreeMap<String, Buckets<Environment, Sensitivity>> {
        let mut view: BTreeMap<String, Buckets<Environment, Sensitivity>> = self
            .set_names
            .iter()
            .map(|name| (name.clone(), empty_buckets(&Environment::ALL, &Sensitivity::ALL)))
            .collect();
        for p in &self.placements {
            view.entry(p.set.clone())
                .or_default()
                .entry(p.environment)
                .or_default()
                .entry(p.sensitivity)
                .or_default()
                .insert(p.name.clone(), p.value.clone());
        }
        view
    }

    /// `{environment: {sensitivity: {name: value}}}` with all sets merged in
    /// override order.
    pub fn flattened(&self) -> Buckets<Environment, Sensitivity> {
        let mut view = empty_buckets(&Environment::ALL, &Sensitivity::ALL);
        for p in &self.placements {
            view.entry(p.environment)
                .or_default()
                .entry(p.sensitivity)
                .or_default()
                .insert(p.name.clone(), p.value.clone());
        }
        view
    }
}

fn empty_buckets<A: Ord + Copy, B: Ord + Copy>(outer: &[A], inner: &[B]) -> Buckets<A, B> {
    outer
        .iter()
        .map(|&a| (a, inner.iter().map(|&b| (b, Bucket::new())).collect()))
        .collect()
}
