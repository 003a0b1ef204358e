//! Stagemake manifest Abstract Syntax Tree structures.
//!
//! This module defines the data structures used to represent a parsed
//! `stagemake.json` (or YAML) manifest. They mirror the on-disk schema and are
//! deserialised with `serde_json` or `serde-saphyr`.
//!
//! The following example shows how to parse a minimal manifest string:
//!
//! ```rust
//! use stagemake::ast::Manifest;
//!
//! let json = r#"{"targets": {"hello": {"recipe": "echo hi", "prerequisites": ""}}}"#;
//! let manifest: Manifest = serde_json::from_str(json).expect("parse");
//! assert_eq!(manifest.goal(), "all");
//! assert_eq!(manifest.targets["hello"].recipe, "echo hi");
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Goal built when neither the manifest nor the command line names one.
pub const DEFAULT_GOAL: &str = "all";

/// Ordered map of placeholder names to their substitution text.
pub type Variables = IndexMap<String, String>;

/// Top-level manifest structure.
///
/// Target declaration order is preserved so that staging and debug output
/// follow the order the author wrote.
///
/// ```json
/// {
///   "defaultGoal": "app",
///   "variables": { "CC": "cc" },
///   "targets": {
///     "app": { "recipe": "$CC -o app main.c", "prerequisites": "main.c" }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name of the target built when the command line does not name one.
    #[serde(default, rename = "defaultGoal")]
    pub default_goal: Option<String>,

    /// Placeholder substitutions applied to every target field.
    #[serde(default)]
    pub variables: Variables,

    /// Build targets keyed by name.
    pub targets: IndexMap<String, TargetDef>,
}

impl Manifest {
    /// Return the declared default goal, falling back to [`DEFAULT_GOAL`].
    #[must_use]
    pub fn goal(&self) -> &str {
        self.default_goal.as_deref().unwrap_or(DEFAULT_GOAL)
    }
}

/// A single target definition exactly as written in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDef {
    /// Explicit target name. Defaults to the map key when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shell command that produces the target.
    pub recipe: String,

    /// Whitespace separated target names or file paths.
    #[serde(default)]
    pub prerequisites: String,
}
