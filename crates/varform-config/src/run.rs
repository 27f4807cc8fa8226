//! Resolved run configuration.

use crate::{ConfigError, ConfigFile, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use varform_core::{Environment, OverrideOrder, ScopePolicy, Sensitivity, sanitize_identifier};

pub const DEFAULT_SPACE: &str = "Spaces-1";
const DEFAULT_INPUT_DIRECTORY: &str = "generated/";
const LIBRARY_SETS_DIR: &str = "libraryvariablesets";
const VARIABLES_DIR: &str = "variables";
const FULLSET_DIR: &str = "fullset";
const SETLISTS_DIR: &str = "setlists";

/// Which set of declaration files a run produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One comprehensive file plus the set manifest.
    #[default]
    Fullset,
    /// Per-environment parameter/secret files over the flat merged view.
    Legacy,
}

impl FromStr for OutputMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s {
            "fullset" => Ok(OutputMode::Fullset),
            "legacy" => Ok(OutputMode::Legacy),
            other => Err(ConfigError::InvalidValue {
                field: "mode".to_string(),
                message: format!("unknown output mode '{}' (expected fullset or legacy)", other),
            }),
        }
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputMode::Fullset => write!(f, "fullset"),
            OutputMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Root of the export tree. Always ends with a path separator.
    pub input_directory: PathBuf,
    /// Root under which declaration files are written.
    pub data_path: PathBuf,
    /// Project being processed.
    pub project: String,
    /// Space id directory inside the project export.
    pub space: String,
    pub mode: OutputMode,
    pub scope_policy: ScopePolicy,
    pub override_order: OverrideOrder,
}

impl RunConfig {
    /// Export directory for this project's space.
    pub fn space_root(&self) -> PathBuf {
        self.input_directory.join(&self.project).join(&self.space)
    }

    pub fn library_sets_dir(&self) -> PathBuf {
        self.space_root().join(LIBRARY_SETS_DIR)
    }

    pub fn variables_dir(&self) -> PathBuf {
        self.space_root().join(VARIABLES_DIR)
    }

    /// Identifier-safe local name for the project.
    pub fn local_name(&self) -> String {
        sanitize_identifier(&self.project)
    }

    /// `<data>/fullset/<project>.tf`
    pub fn fullset_path(&self) -> PathBuf {
        self.data_path
            .join(FULLSET_DIR)
            .join(format!("{}.tf", self.project))
    }

    /// Manifest location; depends on the output mode.
    pub fn manifest_path(&self) -> PathBuf {
        let dir = match self.mode {
            OutputMode::Fullset => FULLSET_DIR,
            OutputMode::Legacy => SETLISTS_DIR,
        };
        self.data_path
            .join(dir)
            .join(format!("{}-parametersets.tf", self.project))
    }

    /// `<data>/<project>/<environment>-<project>-<parameters|secrets>.tf`
    pub fn scoped_path(&self, environment: Environment, sensitivity: Sensitivity) -> PathBuf {
        self.data_path.join(&self.project).join(format!(
            "{}-{}-{}.tf",
            environment, self.project, sensitivity
        ))
    }
}

/// Builder for [`RunConfig`].
///
/// Explicit `with_*` values win over values merged in from a config file,
/// regardless of call order.
#[derive(Debug, Clone, Default)]
pub struct RunConfigBuilder {
    input_directory: Option<PathBuf>,
    data_path: Option<PathBuf>,
    project: Option<String>,
    space: Option<String>,
    mode: Option<OutputMode>,
    scope_policy: Option<ScopePolicy>,
    override_order: Option<OverrideOrder>,
    file: ConfigFile,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_directory = Some(path.into());
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_space(mut self, space: impl Into<String>) -> Self {
        self.space = Some(space.into());
        self
    }

    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_scope_policy(mut self, policy: ScopePolicy) -> Self {
        self.scope_policy = Some(policy);
        self
    }

    pub fn with_override_order(mut self, order: OverrideOrder) -> Self {
        self.override_order = Some(order);
        self
    }

    /// Layer a parsed config file underneath the explicit values.
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        self.file = file;
        self
    }

    /// Resolve against the process working directory.
    pub fn build(self) -> ConfigResult<RunConfig> {
        let cwd = std::env::current_dir()?;
        self.build_in(&cwd)
    }

    /// Resolve, taking relative defaults from `cwd`.
    pub fn build_in(self, cwd: &Path) -> ConfigResult<RunConfig> {
        let file = self.file;

        let project = self
            .project
            .or(file.project)
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("project-name".to_string()))?;

        let input_directory = self
            .input_directory
            .or(file.input_directory)
            .unwrap_or_else(|| cwd.join(DEFAULT_INPUT_DIRECTORY));
        if !ends_with_separator(&input_directory) {
            return Err(ConfigError::InvalidValue {
                field: "input-directory".to_string(),
                message: format!("must end with /; {} is invalid", input_directory.display()),
            });
        }

        let data_path = self
            .data_path
            .or(file.data_path)
            .unwrap_or_else(|| cwd.to_path_buf());

        Ok(RunConfig {
            input_directory,
            data_path,
            project,
            space: self
                .space
                .or(file.space)
                .unwrap_or_else(|| DEFAULT_SPACE.to_string()),
            mode: self.mode.or(file.mode).unwrap_or_default(),
            scope_policy: self.scope_policy.or(file.scope_policy).unwrap_or_default(),
            override_order: self
                .override_order
                .or(file.override_order)
                .unwrap_or_default(),
        })
    }
}

fn ends_with_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> PathBuf {
        PathBuf::from("/work")
    }

    #[test]
    fn test_defaults() {
        let config = RunConfigBuilder::new()
            .with_project("billing")
            .build_in(&cwd())
            .unwrap();

        assert_eq!(config.input_directory, PathBuf::from("/work/generated/"));
        assert_eq!(config.data_path, PathBuf::from("/work"));
        assert_eq!(config.space, "Spaces-1");
        assert_eq!(config.mode, OutputMode::Fullset);
        assert_eq!(config.scope_policy, ScopePolicy::Strict);
        assert_eq!(config.override_order, OverrideOrder::OwnerId);
    }

    #[test]
    fn test_missing_project() {
        let result = RunConfigBuilder::new().build_in(&cwd());
        assert!(matches!(result.unwrap_err(), ConfigError::MissingField(_)));

        let result = RunConfigBuilder::new().with_project("  ").build_in(&cwd());
        assert!(matches!(result.unwrap_err(), ConfigError::MissingField(_)));
    }

    #[test]
    fn test_input_directory_needs_trailing_separator() {
        let result = RunConfigBuilder::new()
            .with_project("billing")
            .with_input_directory("/exports")
            .build_in(&cwd());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidValue { field, .. } if field == "input-directory"
        ));
    }

    #[test]
    fn test_explicit_values_win_over_file() {
        let file = ConfigFile {
            project: Some("from-file".to_string()),
            space: Some("Spaces-7".to_string()),
            scope_policy: Some(ScopePolicy::Lenient),
            ..ConfigFile::default()
        };
        let config = RunConfigBuilder::new()
            .with_project("from-flag")
            .with_file(file)
            .build_in(&cwd())
            .unwrap();

        assert_eq!(config.project, "from-flag");
        assert_eq!(config.space, "Spaces-7");
        assert_eq!(config.scope_policy, ScopePolicy::Lenient);
    }

    #[test]
    fn test_paths() {
        let config = RunConfigBuilder::new()
            .with_project("billing-api")
            .with_input_directory("/exports/")
            .with_data_path("/out")
            .build_in(&cwd())
            .unwrap();

        assert_eq!(
            config.variables_dir(),
            PathBuf::from("/exports/billing-api/Spaces-1/variables")
        );
        assert_eq!(
            config.library_sets_dir(),
            PathBuf::from("/exports/billing-api/Spaces-1/libraryvariablesets")
        );
        assert_eq!(config.fullset_path(), PathBuf::from("/out/fullset/billing-api.tf"));
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/out/fullset/billing-api-parametersets.tf")
        );
        assert_eq!(
            config.scoped_path(Environment::Staging, Sensitivity::Secrets),
            PathBuf::from("/out/billing-api/staging-billing-api-secrets.tf")
        );
        assert_eq!(config.local_name(), "billing_api");
    }

    #[test]
    fn test_legacy_manifest_goes_to_setlists() {
        let config = RunConfigBuilder::new()
            .with_project("billing")
            .with_data_path("/out")
            .with_mode(OutputMode::Legacy)
            .build_in(&cwd())
            .unwrap();
        assert_eq!(
            config.manifest_path(),
            PathBuf::from("/out/setlists/billing-parametersets.tf")
        );
    }

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("fullset".parse::<OutputMode>().unwrap(), OutputMode::Fullset);
        assert_eq!("legacy".parse::<OutputMode>().unwrap(), OutputMode::Legacy);
        assert!("scoped".parse::<OutputMode>().is_err());
    }
}
