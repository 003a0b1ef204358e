//! Recipe redaction for logging.
//!
//! Recipes are split into shell words; any `key=value` word whose key names a
//! credential has its value replaced before the recipe reaches the log.

const SENSITIVE_KEYS: [&str; 6] = ["password", "passwd", "token", "secret", "apikey", "api_key"];

fn is_sensitive_key(key: &str) -> bool {
    let lower = key.trim_start_matches('-').to_ascii_lowercase();
    SENSITIVE_KEYS.iter().any(|candidate| lower.contains(candidate))
}

/// Redact the value of a single `key=value` word when the key is sensitive.
///
/// # Examples
/// ```
/// use stagemake::runner::redact_word;
/// assert_eq!(redact_word("--token=abc"), "--token=***REDACTED***");
/// assert_eq!(redact_word("path=/tmp"), "path=/tmp");
/// ```
#[must_use]
pub fn redact_word(word: &str) -> String {
    match word.split_once('=') {
        Some((key, _)) if is_sensitive_key(key) => format!("{key}=***REDACTED***"),
        _ => word.to_owned(),
    }
}

/// Redact every sensitive word of `recipe`.
///
/// Recipes that are not valid shell syntax are split on whitespace instead.
#[must_use]
pub fn redact_recipe(recipe: &str) -> String {
    let words = shlex::split(recipe)
        .unwrap_or_else(|| recipe.split_whitespace().map(str::to_owned).collect());
    words
        .iter()
        .map(|word| redact_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}
