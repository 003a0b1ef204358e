//! Build status reporting and plan rendering.
//!
//! Reporters receive recipe lifecycle events from the executor and decide how
//! to surface captured output. [`ConsoleReporter`] forwards output verbatim,
//! [`ProgressReporter`] adds an `indicatif` spinner, and [`SilentReporter`]
//! discards everything.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::ir::{StagedGraph, Target};
use crate::plan::BuildPlan;
use crate::runner::RecipeOutput;

/// Receive progress events while a build sequence executes.
pub trait BuildReporter {
    /// A recipe is about to run; `index` is one-based.
    fn report_start(&self, index: usize, total: usize, target: &Target);

    /// A recipe finished and produced `output`.
    fn report_output(&self, target: &Target, output: &RecipeOutput);

    /// Every recipe in the sequence succeeded.
    fn report_complete(&self, goal: &str, built: usize);
}

fn completion_message(goal: &str, built: usize) -> String {
    if built == 0 {
        format!("\u{2714} nothing to be done for {goal}")
    } else {
        "\u{2714} build succeeded".to_owned()
    }
}

/// Forward recipe output to this process's standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl BuildReporter for ConsoleReporter {
    fn report_start(&self, _index: usize, _total: usize, _target: &Target) {}

    fn report_output(&self, _target: &Target, output: &RecipeOutput) {
        // Write failures on our own streams must not abort the build.
        if !output.stdout.is_empty() {
            drop(io::stdout().lock().write_all(&output.stdout));
        }
        if !output.stderr.is_empty() {
            drop(io::stderr().lock().write_all(&output.stderr));
        }
    }

    fn report_complete(&self, goal: &str, built: usize) {
        drop(writeln!(io::stdout(), "{}", completion_message(goal, built)));
    }
}

/// Silent reporter: emits nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl BuildReporter for SilentReporter {
    fn report_start(&self, _index: usize, _total: usize, _target: &Target) {}
    fn report_output(&self, _target: &Target, _output: &RecipeOutput) {}
    fn report_complete(&self, _goal: &str, _built: usize) {}
}

/// Console reporter with a spinner naming the recipe in flight.
#[derive(Debug)]
pub struct ProgressReporter {
    bar: ProgressBar,
    console: ConsoleReporter,
}

impl ProgressReporter {
    /// Construct a spinner drawn on standard error.
    #[must_use]
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr_with_hz(12));
        let style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        Self {
            bar,
            console: ConsoleReporter,
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildReporter for ProgressReporter {
    fn report_start(&self, index: usize, total: usize, target: &Target) {
        self.bar.set_message(format!("[{index}/{total}] {}", target.key));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn report_output(&self, target: &Target, output: &RecipeOutput) {
        self.bar
            .suspend(|| self.console.report_output(target, output));
    }

    fn report_complete(&self, goal: &str, built: usize) {
        self.bar.finish_and_clear();
        self.console.report_complete(goal, built);
    }
}

/// Render the stages as a box-drawn tree, one line per target.
///
/// ```
/// use stagemake::fs::WorkspaceFs;
/// use stagemake::ir::{Target, TargetSet};
/// use stagemake::report::render_stage_tree;
///
/// let targets: TargetSet = [
///     Target::new("all", "true", "a b"),
///     Target::new("a", "true", ""),
///     Target::new("b", "true", ""),
/// ]
/// .into_iter()
/// .collect();
/// let staged = targets.stage("all", &WorkspaceFs::new(".")).expect("stage");
/// assert_eq!(
///     render_stage_tree(&staged),
///     vec!["\u{250c} stages:", "\u{251c}\u{252c} a", "\u{2502}\u{2514} b", "\u{2514}\u{2500} all"],
/// );
/// ```
#[must_use]
pub fn render_stage_tree(staged: &StagedGraph<'_>) -> Vec<String> {
    let mut lines = vec!["\u{250c} stages:".to_owned()];
    let count = staged.stages().len();
    for (i, stage) in staged.stages().iter().enumerate() {
        let last_stage = i + 1 == count;
        let branch = if last_stage { '\u{2514}' } else { '\u{251c}' };
        let stem = if last_stage { ' ' } else { '\u{2502}' };
        for (j, target) in stage.targets().iter().enumerate() {
            let twig = match (j, stage.len()) {
                (0, 1) => '\u{2500}',
                (0, _) => '\u{252c}',
                (idx, len) if idx + 1 == len => '\u{2514}',
                _ => '\u{251c}',
            };
            let lead = if j == 0 { branch } else { stem };
            lines.push(format!("{lead}{twig} {}", target.key));
        }
    }
    lines
}

/// Render the staleness verdicts and the final sequence of a plan.
#[must_use]
pub fn render_plan(plan: &BuildPlan<'_>) -> Vec<String> {
    let mut lines: Vec<String> = plan
        .verdicts()
        .iter()
        .map(|verdict| {
            let mark = if verdict.staleness.is_stale() {
                "build"
            } else {
                "skip "
            };
            format!("{mark} {} ({})", verdict.target.key, verdict.staleness)
        })
        .collect();
    if plan.is_empty() {
        lines.push("sequence: (empty)".to_owned());
    } else {
        lines.push(format!("sequence: {}", plan.describe_sequence()));
    }
    lines
}
