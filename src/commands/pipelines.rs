use crate::config::validate_params_file;
use crate::context::Context;
use crate::error::TowerError;
use crate::output;
use crate::settings::Settings;
use crate::tower::lookup::{check_if_exists, resource_names, validate_id};
use crate::tower::{Pipelines, TowerRunner};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Args, Debug)]
pub struct PipelinesArgs {
    /// Export every pipeline in the workspace to JSON
    #[arg(short = 'e', long)]
    pub export: bool,

    /// Import pipelines from exported JSON files
    #[arg(short = 'i', long)]
    pub import: bool,

    /// Exported JSON files to import, named after the pipeline
    #[arg(long = "json_files", value_name = "FILE", num_args = 1..)]
    pub json_files: Vec<PathBuf>,

    /// Name of the pipeline to add or launch
    #[arg(long = "pipeline_name", value_name = "NAME")]
    pub pipeline_name: Option<String>,

    /// Add a new pipeline to the workspace from a repository
    #[arg(long = "add_new")]
    pub add_new: bool,

    /// Repository to add the pipeline from (e.g. https://github.com/nf-core/rnaseq)
    #[arg(long, value_name = "URL")]
    pub repository: Option<String>,

    /// Launch the pipeline after import or add, or launch an existing one
    #[arg(long)]
    pub launch: bool,

    /// Params file passed along with add or launch
    #[arg(long = "params_file", value_name = "FILE")]
    pub params_file: Option<PathBuf>,

    /// View a pipeline
    #[arg(long, value_name = "NAME")]
    pub view: Option<String>,

    /// Delete a pipeline
    #[arg(long, value_name = "NAME")]
    pub delete: Option<String>,
}

/// Handles the 'pipelines' command - export, import, add and launch
/// pipelines in a workspace. Returns the number of failed resource
/// operations; fatal configuration problems surface as errors instead.
pub struct PipelinesCommand;

impl PipelinesCommand {
    pub fn execute(
        ctx: &Context,
        settings: &Settings,
        args: &PipelinesArgs,
    ) -> Result<usize, TowerError> {
        let selected = args.export
            || args.import
            || args.add_new
            || args.launch
            || args.view.is_some()
            || args.delete.is_some();
        if !selected {
            return Err(TowerError::Usage(
                "provide at least one of --export, --import, --add_new, --launch, --view or --delete"
                    .to_string(),
            ));
        }

        let runner = TowerRunner::new(Arc::clone(&ctx.command));
        let pipelines = Pipelines::new(&runner, &settings.workspace);
        let mut failures = 0;

        if let Some(name) = &args.view {
            let details = pipelines.view(name)?;
            println!("{details:#}");
        }

        if let Some(name) = &args.delete {
            pipelines.delete(name)?;
            output::success(&format!("Deleted pipeline '{name}'"));
        }

        if args.export {
            failures += Self::handle_export(&pipelines)?;
        }

        // Imports name the pipeline after the file, and a following
        // --launch picks up the last imported name
        let mut pipeline_name = args.pipeline_name.clone();

        if args.import {
            if args.json_files.is_empty() {
                return Err(TowerError::Usage(
                    "--import requires --json_files".to_string(),
                ));
            }
            let (import_failures, last_imported) =
                Self::handle_import(&pipelines, &args.json_files)?;
            failures += import_failures;
            if last_imported.is_some() {
                pipeline_name = last_imported;
            }
        }

        if args.add_new {
            let name = pipeline_name.clone().ok_or_else(|| {
                TowerError::Usage("--add_new requires --pipeline_name".to_string())
            })?;
            let repository = args
                .repository
                .as_deref()
                .ok_or_else(|| TowerError::Usage("--add_new requires --repository".to_string()))?;
            failures +=
                Self::handle_add(&pipelines, &name, args.params_file.as_deref(), repository)?;
        }

        if args.launch {
            let name = pipeline_name
                .as_deref()
                .ok_or_else(|| TowerError::Usage("--launch requires --pipeline_name".to_string()))?;
            info!("launching pipeline '{name}'");
            failures += Self::handle_launch(&pipelines, name, args.params_file.as_deref());
        }

        Ok(failures)
    }

    fn handle_export(pipelines: &Pipelines) -> Result<usize, TowerError> {
        let listing = pipelines.list()?;
        let names = resource_names(&listing, "pipelines");

        let mut failures = 0;
        for (index, name) in names.iter().enumerate() {
            output::progress(index + 1, names.len(), name);
            match pipelines.export(name) {
                Ok(outfile) => info!("exported pipeline '{name}' to {}", outfile.display()),
                Err(e) => {
                    error!("failed to export pipeline '{name}': {e}");
                    failures += 1;
                }
            }
        }

        Ok(failures)
    }

    /// Import pipelines from exported JSON files, one pipeline per file,
    /// named after the file stem. Returns the failure count and the last
    /// imported name.
    fn handle_import(
        pipelines: &Pipelines,
        json_files: &[PathBuf],
    ) -> Result<(usize, Option<String>), TowerError> {
        // Missing input files abort the run before anything is imported
        for file in json_files {
            if !file.is_file() {
                return Err(TowerError::InvalidConfigFile {
                    path: file.clone(),
                    reason: "file does not exist".to_string(),
                });
            }
        }

        let mut failures = 0;
        let mut last_imported = None;
        for file in json_files {
            let name = file
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();

            match Self::import_one(pipelines, &name, file) {
                Ok(()) => {
                    output::success(&format!("Pipeline '{name}' imported successfully"));
                    last_imported = Some(name);
                }
                Err(e) => {
                    error!("{e}");
                    failures += 1;
                }
            }
        }

        Ok((failures, last_imported))
    }

    fn import_one(pipelines: &Pipelines, name: &str, file: &Path) -> Result<(), TowerError> {
        check_if_exists(&pipelines.list()?, name)?;
        pipelines.import(name, file)?;
        // Confirm the resource actually showed up under its name
        validate_id(&pipelines.list()?, name)?;
        Ok(())
    }

    fn handle_add(
        pipelines: &Pipelines,
        name: &str,
        params_file: Option<&Path>,
        repository: &str,
    ) -> Result<usize, TowerError> {
        if let Some(params_file) = params_file {
            validate_params_file(params_file)?;
        }

        match pipelines.add(name, params_file, repository) {
            Ok(()) => {
                output::success(&format!("Added pipeline '{name}' from {repository}"));
                Ok(0)
            }
            Err(e) => {
                error!("failed to add pipeline '{name}': {e}");
                Ok(1)
            }
        }
    }

    fn handle_launch(pipelines: &Pipelines, name: &str, params_file: Option<&Path>) -> usize {
        let launched = pipelines
            .list()
            .and_then(|listing| validate_id(&listing, name))
            .and_then(|()| pipelines.launch_by_name(name, params_file));

        match launched {
            Ok(_) => {
                output::success(&format!("Launched pipeline '{name}'"));
                0
            }
            Err(e) => {
                error!("failed to launch pipeline '{name}': {e}");
                1
            }
        }
    }
}
