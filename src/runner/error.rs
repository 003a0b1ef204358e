//! Error types for the runner module.
//!
//! This submodule isolates derive-macro-affected code to scope lint suppressions
//! narrowly.

// The unused_assignments lint fires on miette/thiserror derive expansion in
// some Rust versions only, so `#[expect]` cannot be used.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use crate::ir::StageError;
use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while planning or executing a build.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The manifest file does not exist at the expected path.
    #[error("{path} does not exist!")]
    #[diagnostic(
        code(stagemake::runner::manifest_not_found),
        help("create the manifest or point at one with --file")
    )]
    ManifestNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },

    /// Staging rejected the target graph.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Stage(#[from] StageError),

    /// A recipe could not be started.
    #[error("failed to run recipe for target '{target}'")]
    #[diagnostic(code(stagemake::runner::spawn))]
    Spawn {
        /// Target whose recipe failed to start.
        target: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A recipe exited unsuccessfully; no later recipe was run.
    #[error("recipe for target '{target}' failed with {status}")]
    #[diagnostic(code(stagemake::runner::recipe_failure))]
    RecipeFailure {
        /// Target whose recipe failed.
        target: String,
        /// Exit status reported by the shell.
        status: ExitStatus,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },
}
