//! Display equation numbering rules
//!
//! Decides which rows of a `$$ ... $$` block receive a number:
//! `\tag{..}` fixes a row's tag, `\notag`/`\nonumber` and starred
//! environments suppress it. Multi-line environments are numbered row by
//! row when line-by-line mode is on.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\tag\*?\{([^}]*)\}").unwrap());
static NO_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(?:notag|nonumber)\b").unwrap());
/// Environment opening the body; inner environments do not count
static BEGIN_ENV: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\\begin\{([A-Za-z]+)(\*?)\}").unwrap());

/// Environments whose rows are numbered individually
const MULTILINE_ENVS: [&str; 5] = ["align", "alignat", "flalign", "gather", "eqnarray"];

/// Numbering decision for one row (or a whole single-number block)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTag {
    /// Gets the next sequence index
    Auto,
    /// Written tag, consumes no index
    Fixed(String),
    /// Not numbered
    Unnumbered,
}

/// Numbering decisions for an equation body, in row order
pub fn row_tags(body: &str, line_by_line: bool) -> Vec<RowTag> {
    let top_env = BEGIN_ENV.captures(body);
    let starred = top_env.as_ref().map(|c| !c[2].is_empty()).unwrap_or(false);
    let multiline = top_env
        .as_ref()
        .map(|c| MULTILINE_ENVS.contains(&&c[1]))
        .unwrap_or(false);

    if line_by_line && multiline {
        return split_rows(body)
            .into_iter()
            .map(|row| classify(row, starred))
            .collect();
    }
    vec![classify(body, starred)]
}

fn classify(text: &str, starred: bool) -> RowTag {
    if let Some(caps) = TAG.captures(text) {
        return RowTag::Fixed(caps[1].trim().to_string());
    }
    if starred || NO_TAG.is_match(text) {
        return RowTag::Unnumbered;
    }
    RowTag::Auto
}

/// Rows of the top-level environment body, split on `\\` outside nested
/// environments and braces. A trailing empty row after a final `\\` is
/// dropped.
fn split_rows(body: &str) -> Vec<&str> {
    let start = BEGIN_ENV.find(body).map(|m| m.end()).unwrap_or(0);
    let end = body.rfind("\\end{").unwrap_or(body.len()).max(start);
    let inner = &body[start..end];

    let bytes = inner.as_bytes();
    let mut rows = Vec::new();
    let mut envs = 0usize;
    let mut braces = 0usize;
    let mut row_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let rest = &inner[i..];
                if rest.starts_with("\\\\") {
                    if envs == 0 && braces == 0 {
                        rows.push(&inner[row_start..i]);
                        row_start = i + 2;
                    }
                    i += 2;
                } else if rest.starts_with("\\begin{") {
                    envs += 1;
                    i += "\\begin".len();
                } else if rest.starts_with("\\end{") {
                    envs = envs.saturating_sub(1);
                    i += "\\end".len();
                } else {
                    // escaped character or command initial, e.g. `\{`
                    i += 2;
                }
            }
            b'{' => {
                braces += 1;
                i += 1;
            }
            b'}' => {
                braces = braces.saturating_sub(1);
                i += 1;
            }
            _ => i += 1,
        }
    }
    rows.push(&inner[row_start..]);

    if rows.len() > 1 && rows.last().map(|r| r.trim().is_empty()).unwrap_or(false) {
        rows.pop();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_equation() {
        assert_eq!(row_tags("E = mc^2", true), vec![RowTag::Auto]);
        assert_eq!(
            row_tags("E = mc^2 \\tag{*}", true),
            vec![RowTag::Fixed("*".to_string())]
        );
        assert_eq!(row_tags("x \\notag", true), vec![RowTag::Unnumbered]);
        assert_eq!(
            row_tags("\\begin{equation*} x \\end{equation*}", true),
            vec![RowTag::Unnumbered]
        );
    }

    #[test]
    fn test_align_line_by_line() {
        let body = "\\begin{align}\na &= b \\\\\nc &= d \\nonumber \\\\\ne &= f \\tag{A}\n\\end{align}";
        assert_eq!(
            row_tags(body, true),
            vec![RowTag::Auto, RowTag::Unnumbered, RowTag::Fixed("A".to_string())]
        );
    }

    #[test]
    fn test_align_single_number_when_disabled() {
        let body = "\\begin{align}\na &= b \\\\\nc &= d\n\\end{align}";
        assert_eq!(row_tags(body, false), vec![RowTag::Auto]);
    }

    #[test]
    fn test_starred_align_unnumbered_rows() {
        let body = "\\begin{align*}\na &= b \\\\\nc &= d \\tag{1'}\n\\end{align*}";
        assert_eq!(
            row_tags(body, true),
            vec![RowTag::Unnumbered, RowTag::Fixed("1'".to_string())]
        );
    }

    #[test]
    fn test_trailing_row_break_ignored() {
        let body = "\\begin{gather}\na \\\\\nb \\\\\n\\end{gather}";
        assert_eq!(row_tags(body, true), vec![RowTag::Auto, RowTag::Auto]);
    }

    #[test]
    fn test_multline_is_one_number() {
        let body = "\\begin{multline}\na + b \\\\\n+ c\n\\end{multline}";
        assert_eq!(row_tags(body, true), vec![RowTag::Auto]);
    }

    #[test]
    fn test_nested_matrix_rows_not_numbered() {
        let body = "\\begin{align} A &= \\begin{pmatrix} 1 & 0 \\\\ 0 & 1 \\end{pmatrix} \\\\ B &= 2 \\end{align}";
        assert_eq!(row_tags(body, true), vec![RowTag::Auto, RowTag::Auto]);

        let braced = "\\begin{gather}\nx = \\substack{a \\\\ b} \\\\\ny\n\\end{gather}";
        assert_eq!(row_tags(braced, true), vec![RowTag::Auto, RowTag::Auto]);
    }

    #[test]
    fn test_inner_starred_env_keeps_number() {
        let body = " f(x) = \\begin{cases*} 1 & if x \\\\ 0 & else \\end{cases*} ";
        assert_eq!(row_tags(body, true), vec![RowTag::Auto]);
        assert_eq!(
            row_tags("\n\\begin{equation*} x \\end{equation*}", true),
            vec![RowTag::Unnumbered]
        );
    }
}
