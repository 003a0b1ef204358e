//! Recipe process execution.
//!
//! Recipes run through the shell named by [`SHELL_ENV`] (default
//! [`DEFAULT_SHELL`]) as `<shell> -c <recipe>`, inside the workspace directory.
//! Standard output and standard error are captured in full and handed back to
//! the caller; nothing is streamed while the recipe runs.

use camino::{Utf8Path, Utf8PathBuf};
use shell_env::{DEFAULT_SHELL, SHELL_ENV};
use std::{
    env,
    ffi::OsString,
    io,
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};
use tracing::info;

mod redaction;

pub use redaction::{redact_recipe, redact_word};

/// Captured result of one recipe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeOutput {
    /// Exit status of the shell.
    pub status: ExitStatus,
    /// Everything written to standard output.
    pub stdout: Vec<u8>,
    /// Everything written to standard error.
    pub stderr: Vec<u8>,
}

impl RecipeOutput {
    /// Report whether the recipe exited successfully.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Standard output decoded lossily as UTF-8.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily as UTF-8.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Run a recipe command to completion.
#[cfg_attr(test, mockall::automock)]
pub trait RecipeRunner {
    /// Run `recipe` synchronously and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an [`io::Error`] when the process cannot be spawned or waited
    /// on. A non-zero exit is reported through [`RecipeOutput::status`].
    fn run(&self, recipe: &str) -> io::Result<RecipeOutput>;
}

fn resolve_shell_with<F>(mut read_env: F) -> Utf8PathBuf
where
    F: FnMut(&str) -> Option<OsString>,
{
    read_env(SHELL_ENV)
        .filter(|value| !value.is_empty())
        .and_then(|value| Utf8PathBuf::from_path_buf(PathBuf::from(value)).ok())
        .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_SHELL))
}

/// Resolve the shell used for recipes, honouring [`SHELL_ENV`].
#[must_use]
pub fn resolve_shell() -> Utf8PathBuf {
    resolve_shell_with(|key| env::var_os(key))
}

/// Runs recipes through a POSIX-style shell in a fixed directory.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: Utf8PathBuf,
    workdir: Utf8PathBuf,
}

impl ShellRunner {
    /// Run recipes in `workdir` using the shell from [`resolve_shell`].
    #[must_use]
    pub fn new(workdir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            shell: resolve_shell(),
            workdir: workdir.into(),
        }
    }

    /// Replace the shell program.
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<Utf8PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Shell program recipes are passed to.
    #[must_use]
    pub fn shell(&self) -> &Utf8Path {
        &self.shell
    }
}

impl RecipeRunner for ShellRunner {
    fn run(&self, recipe: &str) -> io::Result<RecipeOutput> {
        info!("Running command: {} -c {}", self.shell, redact_recipe(recipe));
        let output = Command::new(self.shell.as_std_path())
            .arg("-c")
            .arg(recipe)
            .current_dir(self.workdir.as_std_path())
            .stdin(Stdio::null())
            .output()?;
        Ok(RecipeOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
