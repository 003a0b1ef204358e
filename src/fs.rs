//! Filesystem queries used by staging and staleness evaluation.
//!
//! Both operations take paths exactly as written in the manifest. The
//! production [`WorkspaceFs`] resolves relative paths against the workspace
//! directory so `-C` behaves like a working directory change.

use camino::{Utf8Path, Utf8PathBuf};
use std::time::SystemTime;

/// Read-only view of the files targets and prerequisites refer to.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem {
    /// Report whether `path` exists.
    fn exists(&self, path: &str) -> bool;

    /// Return the last-modified time of `path`, or `None` when it cannot be
    /// read.
    fn modified(&self, path: &str) -> Option<SystemTime>;
}

/// Filesystem rooted at a workspace directory.
#[derive(Debug, Clone)]
pub struct WorkspaceFs {
    root: Utf8PathBuf,
}

impl WorkspaceFs {
    /// Resolve paths relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory relative paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Utf8PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for WorkspaceFs {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn modified(&self, path: &str) -> Option<SystemTime> {
        let resolved = self.resolve(path);
        match resolved.metadata().and_then(|meta| meta.modified()) {
            Ok(time) => Some(time),
            Err(err) => {
                tracing::debug!(path = %resolved, error = %err, "unable to read modification time");
                None
            }
        }
    }
}
