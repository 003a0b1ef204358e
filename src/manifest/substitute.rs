//! Placeholder substitution for target fields.
//!
//! A placeholder is `$NAME` followed by a non-word character or the end of
//! the string, so `$CC` never matches the start of `$CCFLAGS`.

use crate::ast::Variables;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace every `$name` placeholder in `text` with `value`.
///
/// # Examples
///
/// ```
/// use stagemake::manifest::substitute;
///
/// assert_eq!(substitute("$CC -c $CCFLAGS", "CC", "gcc"), "gcc -c $CCFLAGS");
/// assert_eq!(substitute("out/$NAME", "NAME", "app"), "out/app");
/// ```
#[must_use]
pub fn substitute(text: &str, name: &str, value: &str) -> String {
    let needle = format!("${name}");
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(&needle) {
        let (before, from_needle) = rest.split_at(pos);
        out.push_str(before);
        let Some(after) = from_needle.strip_prefix(needle.as_str()) else {
            break;
        };
        let at_boundary = after.chars().next().is_none_or(|c| !is_word_char(c));
        out.push_str(if at_boundary { value } else { &needle });
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Apply every variable, in declaration order, to `text`.
#[must_use]
pub fn substitute_all(text: &str, variables: &Variables) -> String {
    variables
        .iter()
        .fold(text.to_owned(), |acc, (name, value)| substitute(&acc, name, value))
}
