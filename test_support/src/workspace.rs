//! Temporary build workspaces with controllable modification times.
//!
//! Staleness depends on file mtimes, which are too coarse on some
//! filesystems to rely on write order. [`Workspace`] pins every file to an
//! explicit age instead.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use stagemake::fs::WorkspaceFs;
use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Base instant that [`Workspace::touch`] ages are measured back from.
const EPOCH_OFFSET: Duration = Duration::from_secs(10 * 24 * 60 * 60);

/// A temporary directory acting as the build root.
#[derive(Debug)]
pub struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
    base: SystemTime,
}

impl Workspace {
    /// Create an empty workspace.
    ///
    /// # Errors
    /// Returns an error when the directory cannot be created or its path is
    /// not valid UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temp workspace")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow::anyhow!("non-UTF-8 temp path {}", path.display()))?;
        let base = SystemTime::now()
            .checked_sub(EPOCH_OFFSET)
            .context("compute base time")?;
        Ok(Self {
            _dir: dir,
            root,
            base,
        })
    }

    /// Workspace directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute path of `relative` inside the workspace.
    #[must_use]
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }

    /// Filesystem view rooted at the workspace.
    #[must_use]
    pub fn fs(&self) -> WorkspaceFs {
        WorkspaceFs::new(self.root.clone())
    }

    /// Write `stagemake.json` with `contents`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be written.
    pub fn write_manifest(&self, contents: &str) -> Result<Utf8PathBuf> {
        self.write("stagemake.json", contents)
    }

    /// Write `contents` to `relative`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error when the file cannot be written.
    pub fn write(&self, relative: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Create `relative` if needed and set its mtime to `tick` seconds after
    /// the workspace base time.
    ///
    /// Larger ticks are newer. Using explicit ticks keeps ordering
    /// deterministic regardless of filesystem timestamp resolution.
    ///
    /// # Errors
    /// Returns an error when the file cannot be created or its mtime set.
    pub fn touch(&self, relative: &str, tick: u64) -> Result<()> {
        let path = self.path(relative);
        if !path.exists() {
            self.write(relative, "")?;
        }
        let file = File::options()
            .write(true)
            .open(&path)
            .with_context(|| format!("open {path}"))?;
        file.set_modified(self.base + Duration::from_secs(tick))
            .with_context(|| format!("set mtime of {path}"))?;
        Ok(())
    }

    /// Read `relative` to a string.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read.
    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 2)]
    #[case(5, 100)]
    fn touch_orders_mtimes(#[case] older: u64, #[case] newer: u64) -> Result<()> {
        let ws = Workspace::new()?;
        ws.touch("old", older)?;
        ws.touch("new", newer)?;
        let old = fs::metadata(ws.path("old"))?.modified()?;
        let new = fs::metadata(ws.path("new"))?.modified()?;
        anyhow::ensure!(old < new, "expected old < new");
        Ok(())
    }

    #[test]
    fn touch_keeps_existing_contents() -> Result<()> {
        let ws = Workspace::new()?;
        ws.write("a.c", "int main;")?;
        ws.touch("a.c", 3)?;
        anyhow::ensure!(ws.read("a.c")? == "int main;");
        Ok(())
    }
}
