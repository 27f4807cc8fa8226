//! varform CLI tool.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;
use varform_config::{ConfigFile, OutputMode, RunConfigBuilder};
use varform_core::{OverrideOrder, ScopePolicy};
use varform_transform::RunSummary;

#[derive(Parser, Debug)]
#[command(name = "varform", version)]
#[command(
    about = "Convert exported deployment variables into Terraform locals",
    long_about = None
)]
struct Cli {
    /// Project name to process
    #[arg(short, long = "project-name", env = "VARFORM_PROJECT")]
    project: Option<String>,

    /// Directory containing exported project data (must end with /)
    #[arg(short, long, env = "VARFORM_INPUT_DIRECTORY")]
    input_directory: Option<PathBuf>,

    /// Root directory for generated declaration files
    #[arg(short, long, env = "VARFORM_DATA_PATH")]
    data_path: Option<PathBuf>,

    /// Space id inside the project export
    #[arg(long, env = "VARFORM_SPACE")]
    space: Option<String>,

    /// Output mode: fullset or legacy
    #[arg(long, env = "VARFORM_MODE")]
    mode: Option<OutputMode>,

    /// Unknown environment handling: strict or lenient
    #[arg(long, env = "VARFORM_SCOPE_POLICY")]
    scope_policy: Option<ScopePolicy>,

    /// Set override order: owner-id or document-id
    #[arg(long, env = "VARFORM_OVERRIDE_ORDER")]
    override_order: Option<OverrideOrder>,

    /// KDL config file supplying defaults for the options above
    #[arg(short, long, env = "VARFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config_builder(&self) -> Result<RunConfigBuilder> {
        let mut builder = RunConfigBuilder::new();

        if let Some(path) = &self.config {
            let file = ConfigFile::load(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            builder = builder.with_file(file);
        }
        if let Some(project) = &self.project {
            builder = builder.with_project(project);
        }
        if let Some(path) = &self.input_directory {
            builder = builder.with_input_directory(path);
        }
        if let Some(path) = &self.data_path {
            builder = builder.with_data_path(path);
        }
        if let Some(space) = &self.space {
            builder = builder.with_space(space);
        }
        if let Some(mode) = self.mode {
            builder = builder.with_mode(mode);
        }
        if let Some(policy) = self.scope_policy {
            builder = builder.with_scope_policy(policy);
        }
        if let Some(order) = self.override_order {
            builder = builder.with_override_order(order);
        }

        Ok(builder)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli
        .config_builder()?
        .build()
        .context("Invalid configuration")?;

    match varform_transform::run(&config) {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, project = %config.project, "Variable transform failed");
            Err(e).with_context(|| format!("Failed to transform project '{}'", config.project))
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Project: {}", summary.project);
    println!("Variable sets: {}", summary.sets);
    println!("Placements: {}", summary.placements);
    if !summary.dropped.is_empty() {
        println!("Dropped (unknown environment): {}", summary.dropped.len());
        for dropped in &summary.dropped {
            println!(
                "  {}.{} -> {}",
                dropped.set, dropped.name, dropped.environment
            );
        }
    }
    println!("Files:");
    for file in &summary.files {
        println!("  {}  {}", file.digest, file.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "varform",
            "-p",
            "billing",
            "--input-directory",
            "/exports/",
            "--data-path",
            "/out",
            "--mode",
            "legacy",
            "--scope-policy",
            "lenient",
            "--override-order",
            "document-id",
        ])
        .unwrap();

        let config = cli
            .config_builder()
            .unwrap()
            .build_in(std::path::Path::new("/work"))
            .unwrap();
        assert_eq!(config.project, "billing");
        assert_eq!(config.input_directory, PathBuf::from("/exports/"));
        assert_eq!(config.data_path, PathBuf::from("/out"));
        assert_eq!(config.mode, OutputMode::Legacy);
        assert_eq!(config.scope_policy, ScopePolicy::Lenient);
        assert_eq!(config.override_order, OverrideOrder::DocumentId);
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let result = Cli::try_parse_from(["varform", "-p", "billing", "--scope-policy", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_project_is_config_error() {
        let cli = Cli::try_parse_from(["varform"]).unwrap();
        let result = cli
            .config_builder()
            .unwrap()
            .build_in(std::path::Path::new("/work"));
        assert!(result.is_err());
    }
}
