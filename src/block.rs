//! Inline math callout settings
//!
//! A math callout starts with a header line such as
//!
//! ```text
//! > [!math|{"type":"theorem","number":"auto","label":"pythagoras","_index":0}] Theorem 1.
//! ```
//!
//! The JSON object carries the block's kind, optional number/title/label,
//! any configuration overrides, and the private `_index` written back by
//! the indexer. The text after the marker is the rendered title.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::constants::CALLOUT_TYPE;
use crate::kind::TheoremKind;

static HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<quote>\s*(?:>\s*)+)\[!{}\|(?P<json>\{{.*\}})\](?P<fold>[+-]?)\s*(?P<title>.*?)\s*$",
        CALLOUT_TYPE
    ))
    .unwrap()
});

/// Per-block settings embedded in the callout header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutSettings {
    #[serde(rename = "type")]
    pub kind: TheoremKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Block-level configuration overrides
    #[serde(flatten)]
    pub overrides: Configuration,
    /// Sequence index assigned by the last indexing pass
    #[serde(rename = "_index", default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl CalloutSettings {
    pub fn new(kind: TheoremKind) -> Self {
        Self {
            kind,
            number: None,
            title: None,
            label: None,
            overrides: Configuration::default(),
            index: None,
        }
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A parsed callout header line
#[derive(Debug, Clone, PartialEq)]
pub struct CalloutHeader {
    /// Blockquote markers and spacing before `[!math|`
    pub quote: String,
    pub settings: CalloutSettings,
    /// Fold marker, `""`, `"+"` or `"-"`
    pub fold: String,
    /// Title text currently shown after the marker
    pub shown_title: String,
}

impl CalloutHeader {
    /// Render the header line with the given shown title
    pub fn render(&self, shown_title: &str) -> crate::error::Result<String> {
        let mut line = format!(
            "{}[!{}|{}]{}",
            self.quote,
            CALLOUT_TYPE,
            self.settings.to_json()?,
            self.fold
        );
        if !shown_title.is_empty() {
            line.push(' ');
            line.push_str(shown_title);
        }
        Ok(line)
    }
}

/// Parse a header line.
///
/// `None`: the line is not a math callout header.
/// `Some(Err(reason))`: it is one, but its settings are malformed.
pub fn parse_header(line: &str) -> Option<Result<CalloutHeader, String>> {
    let caps = HEADER_PATTERN.captures(line)?;
    let settings = match serde_json::from_str::<CalloutSettings>(&caps["json"]) {
        Ok(settings) => settings,
        Err(e) => return Some(Err(e.to_string())),
    };
    Some(Ok(CalloutHeader {
        quote: caps["quote"].to_string(),
        settings,
        fold: caps["fold"].to_string(),
        shown_title: caps["title"].to_string(),
    }))
}

/// Number of `>` markers opening a line
pub fn quote_depth(line: &str) -> usize {
    let mut depth = 0;
    for c in line.chars() {
        match c {
            '>' => depth += 1,
            ' ' | '\t' => {}
            _ => break,
        }
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeral::NumberStyle;

    #[test]
    fn test_parse_header() {
        let line = r#"> [!math|{"type":"theorem","number":"auto","title":"Pythagoras","label":"pyth"}] Theorem 1 (Pythagoras)."#;
        let header = parse_header(line).unwrap().unwrap();
        assert_eq!(header.quote, "> ");
        assert_eq!(header.settings.kind, TheoremKind::Theorem);
        assert_eq!(header.settings.number.as_deref(), Some("auto"));
        assert_eq!(header.settings.label.as_deref(), Some("pyth"));
        assert_eq!(header.shown_title, "Theorem 1 (Pythagoras).");
        assert_eq!(header.fold, "");
    }

    #[test]
    fn test_parse_header_with_overrides_and_fold() {
        let line = r#">> [!math|{"type":"lemma","numberStyle":"roman","_index":3}]- "#;
        let header = parse_header(line).unwrap().unwrap();
        assert_eq!(header.quote, ">> ");
        assert_eq!(header.fold, "-");
        assert_eq!(header.settings.index, Some(3));
        assert_eq!(header.settings.overrides.number_style, Some(NumberStyle::RomanLower));
        assert_eq!(header.shown_title, "");
    }

    #[test]
    fn test_non_math_lines() {
        assert!(parse_header("> [!note] Just a note").is_none());
        assert!(parse_header("[!math|{\"type\":\"theorem\"}]").is_none());
        assert!(parse_header("plain text").is_none());
    }

    #[test]
    fn test_malformed_settings() {
        assert!(parse_header(r#"> [!math|{"type":"theorem",}]"#).unwrap().is_err());
        assert!(parse_header(r#"> [!math|{"type":"proof"}]"#).unwrap().is_err());
        assert!(parse_header(r#"> [!math|{"number":"1"}]"#).unwrap().is_err());
    }

    #[test]
    fn test_render_keeps_settings() {
        let line = r#"> [!math|{"type":"definition","label":"group"}]+ Old"#;
        let mut header = parse_header(line).unwrap().unwrap();
        header.settings.index = Some(0);
        let rendered = header.render("Definition 1.").unwrap();
        assert_eq!(
            rendered,
            r#"> [!math|{"type":"definition","label":"group","_index":0}]+ Definition 1."#
        );
        let again = parse_header(&rendered).unwrap().unwrap();
        assert_eq!(again.settings, header.settings);
    }

    #[test]
    fn test_quote_depth() {
        assert_eq!(quote_depth("> text"), 1);
        assert_eq!(quote_depth("> > text"), 2);
        assert_eq!(quote_depth(">>text"), 2);
        assert_eq!(quote_depth("text"), 0);
    }
}
