//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! loads the manifest and drives the pipeline: stage the graph, plan the
//! stale targets, then execute their recipes one at a time. Library callers
//! that already hold a [`TargetSet`] can use [`build_goal`] directly.

mod error;
mod executor;
mod path_helpers;
mod process;

pub use error::RunnerError;
pub use executor::execute;
#[cfg(test)]
pub use process::MockRecipeRunner;
pub use process::{
    RecipeOutput, RecipeRunner, ShellRunner, redact_recipe, redact_word, resolve_shell,
};

use crate::cli::{Cli, Commands, GoalArgs};
use crate::fs::{Filesystem, WorkspaceFs};
use crate::ir::TargetSet;
use crate::report::{
    BuildReporter, ConsoleReporter, ProgressReporter, render_plan, render_stage_tree,
};
use crate::{manifest, plan};
use anyhow::{Context, Result};
use std::io::{self, Write};
use tracing::debug;

use path_helpers::{ensure_manifest_exists, resolve_manifest_path, resolve_workdir};

/// Stage, plan and execute `goal`.
///
/// Returns the number of recipes run.
///
/// # Errors
///
/// Returns [`RunnerError::Stage`] when the graph cannot be staged (nothing is
/// executed), or the executor's error when a recipe fails.
pub fn build_goal(
    targets: &TargetSet,
    goal: &str,
    fs: &dyn Filesystem,
    runner: &dyn RecipeRunner,
    reporter: &dyn BuildReporter,
) -> Result<usize, RunnerError> {
    let staged = targets.stage(goal, fs)?;
    for line in render_stage_tree(&staged) {
        debug!("{line}");
    }
    let build = plan::plan(&staged, fs);
    let built = execute(build.sequence(), runner, reporter)?;
    reporter.report_complete(goal, built);
    Ok(built)
}

fn make_reporter(progress: bool) -> Box<dyn BuildReporter> {
    if progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(ConsoleReporter)
    }
}

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded, staging fails, or a
/// recipe fails.
pub fn run(cli: &Cli) -> Result<()> {
    let workdir = resolve_workdir(cli)?;
    let manifest_path = resolve_manifest_path(cli, &workdir)?;
    ensure_manifest_exists(&manifest_path)?;
    let manifest = manifest::from_path(&manifest_path)
        .with_context(|| format!("loading manifest at {manifest_path}"))?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let ast_json = serde_json::to_string_pretty(&manifest).context("serialising manifest")?;
        debug!("AST:\n{ast_json}");
    }
    let targets = manifest::resolve(&manifest);
    let fs = WorkspaceFs::new(workdir.clone());

    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Build(GoalArgs { goal: None }));
    match command {
        Commands::Build(args) => {
            let goal = args.goal.as_deref().unwrap_or_else(|| manifest.goal());
            let runner = ShellRunner::new(workdir);
            let reporter = make_reporter(cli.progress.unwrap_or(false));
            build_goal(&targets, goal, &fs, &runner, reporter.as_ref())
                .with_context(|| format!("building {goal}"))?;
            Ok(())
        }
        Commands::Plan(args) => {
            let goal = args.goal.as_deref().unwrap_or_else(|| manifest.goal());
            handle_plan(&targets, goal, &fs)
        }
    }
}

/// Print the stage tree and the planned sequence without running recipes.
fn handle_plan(targets: &TargetSet, goal: &str, fs: &dyn Filesystem) -> Result<()> {
    let staged = targets
        .stage(goal, fs)
        .map_err(RunnerError::from)
        .with_context(|| format!("planning {goal}"))?;
    let build = plan::plan(&staged, fs);
    let mut out = io::stdout().lock();
    for line in render_stage_tree(&staged)
        .into_iter()
        .chain(render_plan(&build))
    {
        writeln!(out, "{line}").context("writing plan")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
