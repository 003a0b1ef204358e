//! Translates manifest parsing errors into actionable diagnostics.
//!
//! Both JSON and YAML parsers report one-based line and column positions.
//! [`map_json_error`] and [`map_yaml_error`] turn those into [`miette`] source
//! spans so the rendered report points at the offending character.

// The unused_assignments lint fires on miette/thiserror derive expansion in
// some Rust versions only, so `#[expect]` cannot be used.
#![allow(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    unused_assignments
)]

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::Error as YamlError;
use thiserror::Error;

const YAML_HINTS: [(&str, &str); 3] = [
    (
        "mapping values are not allowed",
        "Check for a stray ':' or add quotes around values where needed.",
    ),
    (
        "expected ':'",
        "Ensure each key is followed by ':' separating key and value.",
    ),
    (
        "unknown field",
        "Targets accept only `name`, `recipe` and `prerequisites`.",
    ),
];

const JSON_HINTS: [(&str, &str); 3] = [
    (
        "trailing comma",
        "Remove the comma after the last entry of the object.",
    ),
    (
        "missing field `recipe`",
        "Every target needs a `recipe`; use \"true\" for grouping targets.",
    ),
    (
        "unknown field",
        "Targets accept only `name`, `recipe` and `prerequisites`.",
    ),
];

/// Errors raised while reading or parsing a manifest.
#[derive(Debug, Error, Diagnostic)]
pub enum ManifestError {
    /// The manifest could not be read from disk.
    #[error("failed to read manifest {path}")]
    #[diagnostic(code(stagemake::manifest::read))]
    Read {
        /// Manifest path.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The manifest text is malformed or does not match the schema.
    #[error("failed to parse manifest {path}")]
    #[diagnostic(code(stagemake::manifest::parse))]
    Parse {
        /// Manifest path, or a label for in-memory sources.
        path: Utf8PathBuf,
        /// Diagnostic carrying the source span.
        #[source]
        #[diagnostic_source]
        source: Box<dyn Diagnostic + Send + Sync + 'static>,
    },
}

#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(stagemake::manifest::syntax))]
struct ParseDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    message: String,
}

/// Reconstruct the byte offset of a one-based line and column.
///
/// Offsets past the end of a line clamp to the line end; both `\n` and
/// `\r\n` newlines are tolerated.
fn byte_index(src: &str, line: u64, column: u64) -> usize {
    let target_line = usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX);
    let target_column = usize::try_from(column.saturating_sub(1)).unwrap_or(usize::MAX);
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let without_newline = segment.strip_suffix('\n').unwrap_or(segment);
            let cleaned = without_newline
                .strip_suffix('\r')
                .unwrap_or(without_newline);
            let column_offset = cleaned
                .char_indices()
                .nth(target_column)
                .map_or(cleaned.len(), |(byte_idx, _)| byte_idx);
            return offset + column_offset;
        }
        offset += segment.len();
    }
    src.len()
}

fn to_span(src: &str, line: u64, column: u64) -> SourceSpan {
    let at = byte_index(src, line, column);
    let len = usize::from(src.as_bytes().get(at).is_some_and(|b| *b != b'\n' && *b != b'\r'));
    SourceSpan::new(at.into(), len)
}

fn hint_for(hints: &[(&str, &str)], err_str: &str) -> Option<String> {
    let lower = err_str.to_lowercase();
    hints
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| (*hint).to_owned())
}

fn has_tab_indent(src: &str, line: u64) -> bool {
    let line_idx = usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX);
    src.lines().nth(line_idx).is_some_and(|text| {
        text.chars()
            .take_while(|c| c.is_whitespace())
            .any(|c| c == '\t')
    })
}

/// Map a [`serde_json`] error into a diagnostic pointing at its position.
#[must_use]
pub fn map_json_error(
    err: &serde_json::Error,
    src: &str,
    path: &Utf8Path,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let (line, column) = (err.line() as u64, err.column() as u64);
    let span = (line > 0).then(|| to_span(src, line, column));
    let err_str = err.to_string();
    Box::new(ParseDiagnostic {
        src: NamedSource::new(path.as_str(), src.to_owned()),
        span,
        help: hint_for(&JSON_HINTS, &err_str),
        message: format!("JSON parse error: {err_str}"),
    })
}

/// Map a `serde_saphyr` error into a diagnostic pointing at its position.
#[must_use]
pub fn map_yaml_error(
    err: &YamlError,
    src: &str,
    path: &Utf8Path,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let location = err.location();
    let (line, column, span) = location.map_or((1, 1, None), |loc| {
        (loc.line(), loc.column(), Some(to_span(src, loc.line(), loc.column())))
    });
    let err_str = err.to_string();
    let help = if location.is_some() && has_tab_indent(src, line) {
        Some("Use spaces for indentation; tabs are invalid in YAML.".to_owned())
    } else {
        hint_for(&YAML_HINTS, &err_str)
    };
    Box::new(ParseDiagnostic {
        src: NamedSource::new(path.as_str(), src.to_owned()),
        span,
        help,
        message: format!("YAML parse error at line {line}, column {column}: {err_str}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abc\ndef", 2, 2, 5)]
    #[case("abc\r\ndef", 2, 1, 5)]
    #[case("abc\n", 1, 10, 3)]
    #[case("abc", 4, 1, 3)]
    fn byte_index_handles_line_endings(
        #[case] src: &str,
        #[case] line: u64,
        #[case] column: u64,
        #[case] expected: usize,
    ) {
        assert_eq!(byte_index(src, line, column), expected);
    }

    #[test]
    fn json_error_carries_hint_for_missing_recipe() {
        let src = r#"{"targets": {"all": {"prerequisites": ""}}}"#;
        let err = serde_json::from_str::<crate::ast::Manifest>(src).expect_err("missing recipe");
        let diag = map_json_error(&err, src, Utf8Path::new("stagemake.json"));
        let help = diag.help().map(|h| h.to_string()).unwrap_or_default();
        assert!(help.contains("recipe"), "unexpected help: {help}");
        assert!(diag.to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn yaml_error_reports_position() {
        let src = "targets:\n  all: [\n";
        let err = serde_saphyr::from_str::<crate::ast::Manifest>(src).expect_err("bad yaml");
        let diag = map_yaml_error(&err, src, Utf8Path::new("stagemake.yml"));
        assert!(diag.to_string().contains("YAML parse error at line"));
    }
}
