//! Test utilities for Stagemake.
//!
//! Provides temporary workspaces with controllable modification times,
//! manifest builders, and fake recipe scripts for behavioural tests.

pub mod error;
pub mod manifest;
pub mod workspace;

pub use error::display_error_chain;
pub use manifest::ManifestBuilder;
pub use workspace::Workspace;

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a fake executable script that exits with `exit_code`.
///
/// The script appends its name to `ran.log` in the current directory before
/// exiting, so tests can observe which recipes actually ran.
///
/// Returns the temporary directory and the path to the executable.
pub fn fake_script(name: &str, exit_code: i32) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join(name);
    let mut file = File::create(&path).expect("script");
    writeln!(file, "#!/bin/sh\necho {name} >> ran.log\nexit {exit_code}").expect("write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&path).expect("meta").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("perms");
    }
    (dir, path)
}
