//! EditOp module - verified in-place document edits
//!
//! Write-back never blindly overwrites: every edit names the content it
//! expects to find, and the whole batch fails if any expectation does not
//! hold.

use std::fmt;

/// Validation error for edit operations
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The line no longer holds the expected content
    LineMismatch { line: usize, expected: String, found: String },
    /// Invalid line number
    InvalidLine { line: usize, max_line: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::LineMismatch { line, expected, found } => {
                write!(f, "Line {} changed: expected {:?}, found {:?}", line, expected, found)
            }
            ValidationError::InvalidLine { line, max_line } => {
                write!(f, "Invalid line {} (max: {})", line, max_line)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Edit operation type
#[derive(Debug, Clone, PartialEq)]
pub enum EditOp {
    /// Replace a whole line (0-indexed) that must currently equal `expected`
    ReplaceLine {
        line: usize,
        expected: String,
        content: String,
    },
}

impl EditOp {
    /// Create a verified line replacement
    pub fn replace_line(line: usize, expected: impl Into<String>, content: impl Into<String>) -> Self {
        EditOp::ReplaceLine {
            line,
            expected: expected.into(),
            content: content.into(),
        }
    }
}

/// Apply a list of edit operations to content
///
/// Operations are applied in order. If any operation fails, nothing is
/// returned but the error; the caller keeps its original content.
pub fn apply_edits(content: &str, edits: Vec<EditOp>) -> Result<String, ValidationError> {
    // Splitting on '\n' keeps '\r' and the trailing newline intact
    let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();

    for edit in edits {
        apply_single_edit(&mut lines, edit)?;
    }

    Ok(lines.join("\n"))
}

fn apply_single_edit(lines: &mut [String], edit: EditOp) -> Result<(), ValidationError> {
    match edit {
        EditOp::ReplaceLine { line, expected, content } => {
            let max_line = lines.len();
            let current = lines
                .get_mut(line)
                .ok_or(ValidationError::InvalidLine { line, max_line })?;
            let found = current.trim_end_matches('\r');
            if found != expected {
                return Err(ValidationError::LineMismatch {
                    line,
                    expected,
                    found: found.to_string(),
                });
            }
            let carriage = if current.ends_with('\r') { "\r" } else { "" };
            *current = format!("{}{}", content, carriage);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_line_success() {
        let content = "a\nb\nc";
        let edits = vec![EditOp::replace_line(1, "b", "B")];
        assert_eq!(apply_edits(content, edits).unwrap(), "a\nB\nc");
    }

    #[test]
    fn test_replace_line_mismatch() {
        let content = "a\nb\nc";
        let edits = vec![EditOp::replace_line(1, "x", "B")];
        let err = apply_edits(content, edits).unwrap_err();
        assert!(matches!(err, ValidationError::LineMismatch { line: 1, .. }));
    }

    #[test]
    fn test_replace_invalid_line() {
        let content = "line 1\nline 2";
        let edits = vec![EditOp::replace_line(5, "x", "y")];
        let err = apply_edits(content, edits).unwrap_err();
        assert_eq!(err, ValidationError::InvalidLine { line: 5, max_line: 2 });
    }

    #[test]
    fn test_failed_batch_reports_error() {
        let content = "a\nb";
        let edits = vec![
            EditOp::replace_line(0, "a", "A"),
            EditOp::replace_line(1, "not b", "B"),
        ];
        assert!(apply_edits(content, edits).is_err());
    }

    #[test]
    fn test_preserve_line_endings() {
        assert_eq!(
            apply_edits("a\nb\n", vec![EditOp::replace_line(0, "a", "A")]).unwrap(),
            "A\nb\n"
        );
        assert_eq!(
            apply_edits("a\r\nb\r\n", vec![EditOp::replace_line(1, "b", "B")]).unwrap(),
            "a\r\nB\r\n"
        );
    }
}
