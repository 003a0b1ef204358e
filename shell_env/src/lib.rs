#![forbid(unsafe_code)]

//! Shared environment constants used across stagemake crates (library, tests,
//! and helpers).

/// Environment variable override for the shell that runs recipes.
///
/// # Examples
///
/// ```
/// use shell_env::SHELL_ENV;
/// assert_eq!(SHELL_ENV, "STAGEMAKE_SHELL");
/// ```
pub const SHELL_ENV: &str = "STAGEMAKE_SHELL";

/// Shell used when [`SHELL_ENV`] is unset.
pub const DEFAULT_SHELL: &str = "sh";
