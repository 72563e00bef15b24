use crate::context::Context;
use crate::error::TowerError;
use crate::output;
use crate::settings::Settings;
use crate::tower::lookup::{check_if_exists, resource_names, validate_id};
use crate::tower::{validate_credentials, ComputeEnvs, TowerRunner};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct ComputeEnvsArgs {
    /// Export every compute environment in the workspace to JSON
    #[arg(long)]
    pub export: bool,

    /// Import compute environments from exported JSON files
    #[arg(long)]
    pub import: bool,

    /// Exported JSON files to import, named after the compute environment
    #[arg(long = "json_files", value_name = "FILE", num_args = 1..)]
    pub json_files: Vec<PathBuf>,

    /// Credentials name the imported environments are attached to
    #[arg(long, value_name = "NAME")]
    pub credentials: Option<String>,

    /// View a compute environment
    #[arg(long, value_name = "NAME")]
    pub view: Option<String>,

    /// Delete a compute environment
    #[arg(long, value_name = "NAME")]
    pub delete: Option<String>,

    /// Set a compute environment as the workspace primary
    #[arg(long = "set_default", value_name = "NAME")]
    pub set_default: Option<String>,
}

/// Handles the 'compute-envs' command - export and import compute
/// environments. Returns the number of failed resource operations.
pub struct ComputeEnvsCommand;

impl ComputeEnvsCommand {
    pub fn execute(
        ctx: &Context,
        settings: &Settings,
        args: &ComputeEnvsArgs,
    ) -> Result<usize, TowerError> {
        let selected = args.export
            || args.import
            || args.view.is_some()
            || args.delete.is_some()
            || args.set_default.is_some();
        if !selected {
            return Err(TowerError::Usage(
                "provide at least one of --export, --import, --view, --delete or --set_default"
                    .to_string(),
            ));
        }

        let runner = TowerRunner::new(Arc::clone(&ctx.command));
        let compute_envs = ComputeEnvs::new(&runner, &settings.workspace);
        let mut failures = 0;

        if let Some(name) = &args.view {
            let details = compute_envs.view(name)?;
            println!("{details:#}");
        }

        if let Some(name) = &args.delete {
            compute_envs.delete(name)?;
            output::success(&format!("Deleted compute environment '{name}'"));
        }

        if let Some(name) = &args.set_default {
            compute_envs.set_primary(name)?;
            output::success(&format!("Compute environment '{name}' set as primary"));
        }

        if args.export {
            failures += Self::handle_export(&compute_envs)?;
        }

        if args.import {
            if args.json_files.is_empty() {
                return Err(TowerError::Usage(
                    "--import requires --json_files".to_string(),
                ));
            }
            let credentials = args.credentials.as_deref().ok_or_else(|| {
                TowerError::Usage("--import requires --credentials".to_string())
            })?;
            failures += Self::handle_import(
                &runner,
                &compute_envs,
                &settings.workspace,
                &args.json_files,
                credentials,
            )?;
        }

        Ok(failures)
    }

    fn handle_export(compute_envs: &ComputeEnvs) -> Result<usize, TowerError> {
        let listing = compute_envs.list()?;
        let names = resource_names(&listing, "computeEnvs");

        let mut failures = 0;
        for (index, name) in names.iter().enumerate() {
            output::progress(index + 1, names.len(), name);
            match compute_envs.export(name) {
                Ok(outfile) => info!(
                    "exported compute environment '{name}' to {}",
                    outfile.display()
                ),
                Err(e) => {
                    error!("failed to export compute environment '{name}': {e}");
                    failures += 1;
                }
            }
        }

        Ok(failures)
    }

    fn handle_import(
        runner: &TowerRunner,
        compute_envs: &ComputeEnvs,
        workspace: &str,
        json_files: &[PathBuf],
        credentials: &str,
    ) -> Result<usize, TowerError> {
        // Bad credentials or missing input files abort the run before
        // anything is imported
        validate_credentials(runner, workspace, credentials)?;
        for file in json_files {
            if !file.is_file() {
                return Err(TowerError::InvalidConfigFile {
                    path: file.clone(),
                    reason: "file does not exist".to_string(),
                });
            }
        }

        let mut failures = 0;
        for file in json_files {
            let name = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();

            match Self::import_one(compute_envs, &name, file, credentials) {
                Ok(()) => {
                    output::success(&format!(
                        "Compute environment '{name}' imported successfully"
                    ));
                }
                Err(e) => {
                    error!("{e}");
                    failures += 1;
                }
            }
        }

        Ok(failures)
    }

    fn import_one(
        compute_envs: &ComputeEnvs,
        name: &str,
        file: &Path,
        credentials: &str,
    ) -> Result<(), TowerError> {
        check_if_exists(&compute_envs.list()?, name)?;
        compute_envs.import(name, file, credentials)?;
        // Confirm the resource actually showed up under its name
        validate_id(&compute_envs.list()?, name)?;
        Ok(())
    }
}
