//! Error types raised while staging the target graph.

use miette::Diagnostic;
use thiserror::Error;

/// Fatal configuration problems detected before any recipe runs.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum StageError {
    /// The requested goal is not a declared target.
    #[error("No default goal found! Target '{goal}' is not defined.")]
    #[diagnostic(
        code(stagemake::ir::configuration_missing),
        help("declare the target or pass an existing goal on the command line")
    )]
    ConfigurationMissing {
        /// Goal that was requested.
        goal: String,
    },

    /// A prerequisite is neither a target nor an existing file.
    #[error("No rule to make target '{prerequisite}', needed by '{target}'.")]
    #[diagnostic(code(stagemake::ir::unresolved_prerequisite))]
    UnresolvedPrerequisite {
        /// Target that declared the prerequisite.
        target: String,
        /// Unresolved prerequisite token.
        prerequisite: String,
    },

    /// The targets reachable from the goal form a cycle.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    #[diagnostic(code(stagemake::ir::cyclic_dependency))]
    CyclicDependency {
        /// Target keys along the cycle; the first key is repeated at the end.
        cycle: Vec<String>,
    },
}
