//! Intermediate Representation structures.
//!
//! This module defines the resolved target model used after manifest loading
//! and the staged graph derived from it. Targets are immutable value objects;
//! staging borrows them and never rewrites the set.
//!
//! # Examples
//!
//! ```
//! use stagemake::fs::WorkspaceFs;
//! use stagemake::ir::{Target, TargetSet};
//!
//! let mut targets = TargetSet::default();
//! targets.insert(Target::new("all", "true", "lib"));
//! targets.insert(Target::new("lib", "true", ""));
//! let fs = WorkspaceFs::new(".");
//! let staged = targets.stage("all", &fs).expect("stage");
//! assert_eq!(staged.stage_names(), vec![vec!["lib"], vec!["all"]]);
//! ```

mod cycle;
mod error;
mod stager;

pub use error::StageError;
pub use stager::{Stage, StagedGraph};

use indexmap::IndexMap;

/// A resolved build target.
///
/// `key` is the identifier other targets use in their prerequisite lists.
/// `name` is the output path checked for staleness and defaults to the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Identifier used to reference this target as a prerequisite.
    pub key: String,
    /// Output path produced by the recipe.
    pub name: String,
    /// Shell command executed to build the target.
    pub recipe: String,
    /// Prerequisite tokens in declaration order.
    pub prerequisites: Vec<String>,
}

impl Target {
    /// Construct a target whose name matches its key.
    ///
    /// `prerequisites` is split on whitespace; an empty string yields a leaf.
    #[must_use]
    pub fn new(key: &str, recipe: &str, prerequisites: &str) -> Self {
        Self {
            key: key.to_owned(),
            name: key.to_owned(),
            recipe: recipe.to_owned(),
            prerequisites: tokenize(prerequisites),
        }
    }

    /// Override the output name, keeping the key.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        name.clone_into(&mut self.name);
        self
    }
}

/// Split a prerequisite string into tokens.
#[must_use]
pub fn tokenize(prerequisites: &str) -> Vec<String> {
    prerequisites.split_whitespace().map(str::to_owned).collect()
}

/// Targets keyed by identifier, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    targets: IndexMap<String, Target>,
}

impl TargetSet {
    /// Add `target`, replacing any existing target with the same key.
    pub fn insert(&mut self, target: Target) {
        self.targets.insert(target.key.clone(), target);
    }

    /// Look up a target by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Target> {
        self.targets.get(key)
    }

    /// Report whether `key` names a target.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.targets.contains_key(key)
    }

    /// Number of targets in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Report whether the set holds no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Iterate over targets in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }
}

impl FromIterator<Target> for TargetSet {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        let mut set = Self::default();
        for target in iter {
            set.insert(target);
        }
        set
    }
}
