//! Build planning: filter the staged graph down to the targets that must run.
//!
//! The planner walks stages in order and targets in stage-local order,
//! consulting [`staleness::evaluate`] with the keys scheduled so far. A
//! rebuild therefore propagates forward to every dependent visited later in
//! the walk, never backwards.

mod staleness;

pub use staleness::{ScheduledSet, Staleness, evaluate};

use std::collections::HashSet;

use itertools::Itertools;
use tracing::debug;

use crate::fs::Filesystem;
use crate::ir::{StagedGraph, Target};

/// Staleness decision recorded for one staged target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict<'a> {
    /// Target that was examined.
    pub target: &'a Target,
    /// Outcome of the evaluation.
    pub staleness: Staleness,
}

/// Linear, deduplicated, staleness-filtered execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildPlan<'a> {
    sequence: Vec<&'a Target>,
    verdicts: Vec<Verdict<'a>>,
}

impl<'a> BuildPlan<'a> {
    /// Targets to execute, in order.
    #[must_use]
    pub fn sequence(&self) -> &[&'a Target] {
        &self.sequence
    }

    /// Every evaluation made while planning, in walk order.
    #[must_use]
    pub fn verdicts(&self) -> &[Verdict<'a>] {
        &self.verdicts
    }

    /// Report whether nothing needs to run.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Target keys of the sequence joined with arrows.
    #[must_use]
    pub fn describe_sequence(&self) -> String {
        self.sequence.iter().map(|t| t.key.as_str()).join(" \u{279c} ")
    }
}

/// Compute the build sequence for `staged`.
///
/// A target is examined at most once; later occurrences are skipped so the
/// executor never runs the same recipe twice.
#[must_use]
pub fn plan<'a>(staged: &StagedGraph<'a>, fs: &dyn Filesystem) -> BuildPlan<'a> {
    let mut build = BuildPlan::default();
    let mut scheduled = ScheduledSet::default();
    let mut seen: HashSet<&'a str> = HashSet::new();

    for target in staged.targets() {
        if !seen.insert(target.key.as_str()) {
            continue;
        }
        let staleness = evaluate(target, &scheduled, fs);
        if staleness.is_stale() {
            scheduled.insert(target.key.as_str());
            build.sequence.push(target);
        }
        build.verdicts.push(Verdict { target, staleness });
    }

    debug!("sequence {}", build.describe_sequence());
    build
}
