//! Path resolution helpers for the runner module.
//!
//! Centralises workspace and manifest path logic so the main runner module
//! stays focused on command dispatch.

use crate::cli::Cli;
use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use std::path::Path;

use super::RunnerError;

fn to_utf8(path: &Path, what: &str) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|invalid| anyhow!("{what} path {} is not valid UTF-8", invalid.display()))
}

/// Directory that target paths and recipes are resolved against.
///
/// # Errors
/// Returns an error when the CLI `directory` is not valid UTF-8.
pub(super) fn resolve_workdir(cli: &Cli) -> Result<Utf8PathBuf> {
    cli.directory
        .as_deref()
        .map_or_else(|| Ok(Utf8PathBuf::from(".")), |dir| to_utf8(dir, "directory"))
}

/// Determine the manifest path respecting the CLI's directory option.
///
/// Relative manifest paths are joined onto `workdir`; absolute ones are used
/// as given.
///
/// # Errors
/// Returns an error when the CLI `file` is not valid UTF-8 or names no file.
pub(super) fn resolve_manifest_path(cli: &Cli, workdir: &Utf8Path) -> Result<Utf8PathBuf> {
    let file = to_utf8(&cli.file, "manifest")?;
    let resolved = if cli.directory.is_some() {
        workdir.join(&file)
    } else {
        file
    };
    if resolved.file_name().is_none() {
        return Err(anyhow!("manifest path {resolved} does not name a file"));
    }
    Ok(resolved)
}

/// Fail with [`RunnerError::ManifestNotFound`] when the manifest is absent.
pub(super) fn ensure_manifest_exists(manifest_path: &Utf8Path) -> Result<(), RunnerError> {
    if manifest_path.exists() {
        Ok(())
    } else {
        Err(RunnerError::ManifestNotFound {
            path: manifest_path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn manifest_path_joins_directory() {
        let cli = Cli::parse_from(["stagemake", "-C", "work", "-f", "build.yml"]);
        let workdir = resolve_workdir(&cli).expect("workdir");
        assert_eq!(workdir, Utf8PathBuf::from("work"));
        let path = resolve_manifest_path(&cli, &workdir).expect("manifest path");
        assert_eq!(path, Utf8PathBuf::from("work/build.yml"));
    }

    #[test]
    fn manifest_path_defaults_to_current_directory() {
        let cli = Cli::parse_from(["stagemake"]);
        let workdir = resolve_workdir(&cli).expect("workdir");
        assert_eq!(workdir, Utf8PathBuf::from("."));
        let path = resolve_manifest_path(&cli, &workdir).expect("manifest path");
        assert_eq!(path, Utf8PathBuf::from("stagemake.json"));
    }

    #[test]
    fn absent_manifest_is_reported() {
        let err = ensure_manifest_exists(Utf8Path::new("/nonexistent/stagemake.json"))
            .expect_err("absent");
        assert_eq!(err.to_string(), "/nonexistent/stagemake.json does not exist!");
    }
}
