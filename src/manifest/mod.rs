//! Manifest loading helpers.
//!
//! This module reads a `stagemake.json` (or YAML) manifest, substitutes
//! `variables` into every target field and resolves the result into an
//! immutable [`TargetSet`]. Substitution builds a new set; the parsed
//! [`Manifest`] is left untouched.
//!
//! ```rust
//! use stagemake::manifest::{self, ManifestFormat};
//!
//! let json = r#"{
//!     "variables": {"CC": "gcc"},
//!     "targets": {"app": {"recipe": "$CC -o app main.c", "prerequisites": "main.c"}}
//! }"#;
//! let parsed = manifest::from_str(json, ManifestFormat::Json, "inline".into()).expect("parse");
//! let targets = manifest::resolve(&parsed);
//! assert_eq!(targets.get("app").map(|t| t.recipe.as_str()), Some("gcc -o app main.c"));
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

use crate::ast::Manifest;
use crate::ir::{Target, TargetSet, tokenize};

mod diagnostics;
mod substitute;

pub use diagnostics::{ManifestError, map_json_error, map_yaml_error};
pub use substitute::{substitute, substitute_all};

/// Manifest file name looked up when none is given.
pub const DEFAULT_MANIFEST: &str = "stagemake.json";

/// Syntax of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl ManifestFormat {
    /// Choose the format from the file extension; anything other than
    /// `.yml` or `.yaml` is read as JSON.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Parse manifest text in the given format.
///
/// `path` labels the source in diagnostics.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] when the text is malformed or does not
/// match the manifest schema.
pub fn from_str(
    text: &str,
    format: ManifestFormat,
    path: Utf8PathBuf,
) -> Result<Manifest, ManifestError> {
    match format {
        ManifestFormat::Json => serde_json::from_str(text).map_err(|err| ManifestError::Parse {
            source: map_json_error(&err, text, &path),
            path,
        }),
        ManifestFormat::Yaml => serde_saphyr::from_str(text).map_err(|err| ManifestError::Parse {
            source: map_yaml_error(&err, text, &path),
            path,
        }),
    }
}

/// Load a [`Manifest`] from `path`.
///
/// # Errors
///
/// Returns [`ManifestError::Read`] if the file cannot be read, or
/// [`ManifestError::Parse`] if it fails to parse.
pub fn from_path(path: &Utf8Path) -> Result<Manifest, ManifestError> {
    let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_str(&text, ManifestFormat::from_path(path), path.to_path_buf())
}

/// Resolve a parsed manifest into the target set the core operates on.
///
/// Targets without an explicit `name` take their key. Every field other than
/// the key has each variable substituted, in declaration order.
#[must_use]
pub fn resolve(manifest: &Manifest) -> TargetSet {
    let vars = &manifest.variables;
    manifest
        .targets
        .iter()
        .map(|(key, def)| Target {
            key: key.clone(),
            name: substitute_all(def.name.as_deref().unwrap_or(key), vars),
            recipe: substitute_all(&def.recipe, vars),
            prerequisites: tokenize(&substitute_all(&def.prerequisites, vars)),
        })
        .collect()
}
