//! Strictly sequential execution of a build sequence.

use tracing::{debug, info};

use super::{RecipeRunner, RunnerError, redact_recipe};
use crate::ir::Target;
use crate::report::BuildReporter;

/// Run each recipe in `sequence`, in order, stopping at the first failure.
///
/// Each recipe starts only after the previous one has exited. Output is
/// handed to `reporter` as soon as a recipe finishes, including the output of
/// the failing recipe. Success is decided by exit status alone; a successful
/// recipe that writes to standard error is logged, not failed.
///
/// Returns the number of recipes run.
///
/// # Errors
///
/// Returns [`RunnerError::Spawn`] if a recipe cannot be started and
/// [`RunnerError::RecipeFailure`] if one exits unsuccessfully. Targets built
/// before the failure are left in place.
pub fn execute(
    sequence: &[&Target],
    runner: &dyn RecipeRunner,
    reporter: &dyn BuildReporter,
) -> Result<usize, RunnerError> {
    let total = sequence.len();
    for (idx, target) in sequence.iter().enumerate() {
        debug!(
            "Building target {} with recipe {}",
            target.key,
            redact_recipe(&target.recipe)
        );
        reporter.report_start(idx + 1, total, target);
        let output = runner
            .run(&target.recipe)
            .map_err(|source| RunnerError::Spawn {
                target: target.key.clone(),
                source,
            })?;
        reporter.report_output(target, &output);
        if !output.success() {
            return Err(RunnerError::RecipeFailure {
                target: target.key.clone(),
                status: output.status,
                stdout: output.stdout_lossy(),
                stderr: output.stderr_lossy(),
            });
        }
        if !output.stderr.is_empty() {
            info!(target_key = %target.key, "recipe succeeded with output on stderr");
        }
    }
    Ok(total)
}
