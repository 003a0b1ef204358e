//! Unit tests for the runner pipeline glue.

use super::*;
use crate::fs::MockFilesystem;
use crate::ir::{StageError, Target};
use std::cell::RefCell;

#[derive(Default)]
struct RecordingReporter {
    events: RefCell<Vec<String>>,
}

impl BuildReporter for RecordingReporter {
    fn report_start(&self, index: usize, total: usize, target: &Target) {
        self.events
            .borrow_mut()
            .push(format!("start {index}/{total} {}", target.key));
    }

    fn report_output(&self, target: &Target, _output: &RecipeOutput) {
        self.events.borrow_mut().push(format!("output {}", target.key));
    }

    fn report_complete(&self, goal: &str, built: usize) {
        self.events
            .borrow_mut()
            .push(format!("complete {goal} {built}"));
    }
}

fn nothing_on_disk() -> MockFilesystem {
    let mut fs = MockFilesystem::new();
    fs.expect_exists().return_const(false);
    fs.expect_modified().return_const(None::<std::time::SystemTime>);
    fs
}

#[test]
fn unresolved_prerequisite_runs_no_recipe() {
    let targets: TargetSet = [
        Target::new("all", "true", "lib"),
        Target::new("lib", "true", "missing.c"),
    ]
    .into_iter()
    .collect();
    let mut runner = MockRecipeRunner::new();
    runner.expect_run().never();
    let reporter = RecordingReporter::default();

    let err = build_goal(&targets, "all", &nothing_on_disk(), &runner, &reporter)
        .expect_err("staging fails");
    assert!(matches!(
        err,
        RunnerError::Stage(StageError::UnresolvedPrerequisite { .. })
    ));
    assert!(reporter.events.borrow().is_empty());
}

#[test]
fn cycle_is_reported_before_execution() {
    let targets: TargetSet = [
        Target::new("all", "true", "a"),
        Target::new("a", "true", "b"),
        Target::new("b", "true", "a"),
    ]
    .into_iter()
    .collect();
    let mut runner = MockRecipeRunner::new();
    runner.expect_run().never();

    let err = build_goal(
        &targets,
        "all",
        &nothing_on_disk(),
        &runner,
        &RecordingReporter::default(),
    )
    .expect_err("cycle");
    assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
}

#[cfg(unix)]
#[test]
fn builds_stale_targets_in_stage_order() {
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    let targets: TargetSet = [
        Target::new("all", "link", "lib gen"),
        Target::new("lib", "compile", "gen"),
        Target::new("gen", "generate", ""),
    ]
    .into_iter()
    .collect();
    let mut runner = MockRecipeRunner::new();
    runner.expect_run().times(3).returning(|_| {
        Ok(RecipeOutput {
            status: ExitStatus::from_raw(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    });
    let reporter = RecordingReporter::default();

    let built = build_goal(&targets, "all", &nothing_on_disk(), &runner, &reporter)
        .expect("build succeeds");
    assert_eq!(built, 3);
    assert_eq!(
        *reporter.events.borrow(),
        vec![
            "start 1/3 gen",
            "output gen",
            "start 2/3 lib",
            "output lib",
            "start 3/3 all",
            "output all",
            "complete all 3",
        ]
    );
}

#[test]
fn missing_goal_is_configuration_error() {
    let targets: TargetSet = [Target::new("lib", "true", "")].into_iter().collect();
    let mut runner = MockRecipeRunner::new();
    runner.expect_run().never();
    let err = build_goal(
        &targets,
        "all",
        &nothing_on_disk(),
        &runner,
        &RecordingReporter::default(),
    )
    .expect_err("no goal");
    assert!(err.to_string().starts_with("No default goal found!"));
}
