//! Level-order staging of the targets reachable from a goal.
//!
//! Expansion starts from a singleton stage holding the goal. Each round
//! collects the target prerequisites of the current stage into the next one
//! until a round produces nothing. The rounds are then reversed so the
//! deepest prerequisites come first. A target reached along paths of
//! different lengths keeps only its deepest placement, which guarantees that
//! every prerequisite sits in an earlier stage than its dependents.

use std::collections::HashSet;

use tracing::debug;

use super::{StageError, Target, TargetSet, cycle};
use crate::fs::Filesystem;

/// Targets that may be built once every earlier stage has completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage<'a> {
    targets: Vec<&'a Target>,
}

impl<'a> Stage<'a> {
    /// Targets in stage-local order.
    #[must_use]
    pub fn targets(&self) -> &[&'a Target] {
        &self.targets
    }

    /// Number of targets in the stage.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Report whether the stage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Ordered stages, base requirements first and the goal last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedGraph<'a> {
    stages: Vec<Stage<'a>>,
}

impl<'a> StagedGraph<'a> {
    /// Stages in build order.
    #[must_use]
    pub fn stages(&self) -> &[Stage<'a>] {
        &self.stages
    }

    /// Every staged target in build order: stage by stage, then stage-local
    /// order.
    pub fn targets(&self) -> impl Iterator<Item = &'a Target> + '_ {
        self.stages.iter().flat_map(|stage| stage.targets.iter().copied())
    }

    /// Index of the stage holding `key`.
    #[must_use]
    pub fn stage_index(&self, key: &str) -> Option<usize> {
        self.stages
            .iter()
            .position(|stage| stage.targets.iter().any(|t| t.key == key))
    }

    /// Target keys grouped by stage, convenient for display and assertions.
    #[must_use]
    pub fn stage_names(&self) -> Vec<Vec<&'a str>> {
        self.stages
            .iter()
            .map(|stage| stage.targets.iter().map(|t| t.key.as_str()).collect())
            .collect()
    }
}

impl TargetSet {
    /// Stage the targets reachable from `goal`.
    ///
    /// Prerequisite tokens naming a target are expanded; any other token must
    /// name an existing path according to `fs`.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::ConfigurationMissing`] when `goal` is not a
    /// target, [`StageError::CyclicDependency`] when the reachable graph
    /// contains a cycle, and [`StageError::UnresolvedPrerequisite`] when a
    /// token is neither a target nor an existing path.
    pub fn stage<'a>(
        &'a self,
        goal: &str,
        fs: &dyn Filesystem,
    ) -> Result<StagedGraph<'a>, StageError> {
        let root = self
            .get(goal)
            .ok_or_else(|| StageError::ConfigurationMissing {
                goal: goal.to_owned(),
            })?;
        if let Some(cycle) = cycle::find_cycle(self, goal) {
            return Err(StageError::CyclicDependency { cycle });
        }

        let mut rounds = vec![vec![root]];
        let mut current = vec![root];
        loop {
            let next = self.expand_round(&current, fs)?;
            if next.is_empty() {
                break;
            }
            rounds.push(next.clone());
            current = next;
        }

        // Start with base requirements.
        rounds.reverse();
        let mut placed: HashSet<&str> = HashSet::new();
        let stages = rounds
            .into_iter()
            .map(|round| Stage {
                targets: round
                    .into_iter()
                    .filter(|target| placed.insert(target.key.as_str()))
                    .collect(),
            })
            .filter(|stage| !stage.is_empty())
            .collect();
        Ok(StagedGraph { stages })
    }

    fn expand_round<'a>(
        &'a self,
        current: &[&'a Target],
        fs: &dyn Filesystem,
    ) -> Result<Vec<&'a Target>, StageError> {
        let mut next: Vec<&'a Target> = Vec::new();
        for target in current {
            debug!("checking prerequisites for {}", target.key);
            for token in &target.prerequisites {
                if let Some(dep) = self.get(token) {
                    if !next.iter().any(|t| t.key == dep.key) {
                        next.push(dep);
                    }
                    continue;
                }
                if fs.exists(token) {
                    continue;
                }
                return Err(StageError::UnresolvedPrerequisite {
                    target: target.key.clone(),
                    prerequisite: token.clone(),
                });
            }
        }
        Ok(next)
    }
}
