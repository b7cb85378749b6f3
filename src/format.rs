//! Title, label and reference formatting
//!
//! Turns resolved settings plus a sequence index into the strings shown
//! in a document: callout titles (`Theorem 1 (Pythagoras).`), LaTeX-style
//! labels (`geometry:thm:pythagoras`), reference texts and equation tags.

use tracing::{debug, warn};

use crate::config::{RefFormat, ResolvedConfig};
use crate::constants::{DEFAULT_NUMBER_INIT, LABEL_SEPARATOR, NUMBER_AUTO};
use crate::numeral::{convert, NumberStyle};
use crate::resolver::ResolvedSettings;

/// The bare number string (`1`, `IV`, a literal), without prefix/suffix
pub fn number_string(settings: &ResolvedSettings) -> Option<String> {
    let number = settings.number.trim();
    if number.is_empty() {
        return None;
    }
    if number != NUMBER_AUTO {
        return Some(number.to_string());
    }
    match settings.index {
        Some(index) => Some(numeral(
            sequence_number(index, settings.config.number_init),
            settings.config.number_style,
        )),
        None => {
            debug!(kind = %settings.kind, "auto number requested before indexing");
            None
        }
    }
}

/// `index + init`; an init too large to add falls back to the default init
fn sequence_number(index: usize, init: usize) -> usize {
    index.checked_add(init).unwrap_or_else(|| {
        warn!(index, init, "number init out of range, using {}", DEFAULT_NUMBER_INIT);
        index.saturating_add(DEFAULT_NUMBER_INIT)
    })
}

/// `convert`, except that 0 (possible with an init of 0) falls back to
/// arabic for the styles that have no zero
fn numeral(n: usize, style: NumberStyle) -> String {
    if n == 0 && style != NumberStyle::Arabic {
        warn!(%style, "no zero in this numbering style, using 0");
        return n.to_string();
    }
    convert(n, style)
}

/// The number as displayed: `numberPrefix + number + numberSuffix`
pub fn format_number(settings: &ResolvedSettings) -> Option<String> {
    number_string(settings).map(|number| {
        format!(
            "{}{}{}",
            settings.config.number_prefix, number, settings.config.number_suffix
        )
    })
}

/// Callout title: type name, number, parenthesized title, suffix
pub fn format_title(settings: &ResolvedSettings, no_title_suffix: bool) -> String {
    let mut title = settings.type_name.clone();
    if let Some(number) = format_number(settings) {
        title.push(' ');
        title.push_str(&number);
    }
    if let Some(subtitle) = &settings.title {
        title.push_str(&format!(" ({})", subtitle));
    }
    if !no_title_suffix {
        title.push_str(&settings.config.title_suffix);
    }
    title
}

/// `labelPrefix + env prefix + ":" + label`, when the block has a label
pub fn format_label(settings: &ResolvedSettings) -> Option<String> {
    let label = settings.label.as_deref()?;
    Some(format!(
        "{}{}{}{}",
        settings.config.label_prefix,
        settings.kind.label_prefix(),
        LABEL_SEPARATOR,
        label
    ))
}

/// Text used when another note links to the callout
pub fn format_reference(settings: &ResolvedSettings) -> String {
    let type_number = match format_number(settings) {
        Some(number) => format!("{} {}", settings.type_name, number),
        None => settings.type_name.clone(),
    };
    match (settings.config.ref_format, &settings.title) {
        (RefFormat::TypeNumberTitle, Some(title)) => format!("{} ({})", type_number, title),
        (RefFormat::TitleOrTypeNumber, Some(title)) => title.clone(),
        _ => type_number,
    }
}

/// Equation tag: `eqNumberPrefix + number + eqNumberSuffix`
pub fn format_equation_tag(config: &ResolvedConfig, index: usize) -> String {
    format!(
        "{}{}{}",
        config.eq_number_prefix,
        numeral(
            sequence_number(index, config.eq_number_init),
            config.eq_number_style
        ),
        config.eq_number_suffix
    )
}

/// Equation reference: `eqRefPrefix + "(" + tag + ")" + eqRefSuffix`
pub fn format_equation_reference(config: &ResolvedConfig, tag: &str) -> String {
    format!("{}({}){}", config.eq_ref_prefix, tag, config.eq_ref_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::TheoremKind;
    use crate::numeral::NumberStyle;

    fn settings(kind: TheoremKind, index: Option<usize>) -> ResolvedSettings {
        ResolvedSettings {
            config: ResolvedConfig::default(),
            kind,
            type_name: crate::profile::english_name(kind).to_string(),
            number: NUMBER_AUTO.to_string(),
            title: None,
            label: None,
            index,
        }
    }

    #[test]
    fn test_roman_title() {
        let mut s = settings(TheoremKind::Theorem, Some(0));
        s.config.number_style = NumberStyle::RomanUpper;
        s.config.number_init = 1;
        assert_eq!(format_title(&s, true), "Theorem I");
        s.index = Some(2);
        assert_eq!(format_title(&s, true), "Theorem III");
    }

    #[test]
    fn test_title_with_subtitle_and_suffix() {
        let mut s = settings(TheoremKind::Lemma, Some(1));
        s.title = Some("Zorn".to_string());
        s.config.number_prefix = "A.".to_string();
        assert_eq!(format_title(&s, false), "Lemma A.2 (Zorn).");
        assert_eq!(format_title(&s, true), "Lemma A.2 (Zorn)");
    }

    #[test]
    fn test_literal_number_wins_over_style() {
        let mut s = settings(TheoremKind::Theorem, Some(7));
        s.config.number_style = NumberStyle::AlphUpper;
        s.number = "5".to_string();
        assert_eq!(format_title(&s, true), "Theorem 5");
    }

    #[test]
    fn test_unnumbered() {
        let mut s = settings(TheoremKind::Remark, Some(0));
        s.number = String::new();
        assert_eq!(format_title(&s, false), "Remark.");
        let pending = settings(TheoremKind::Remark, None);
        assert_eq!(format_title(&pending, true), "Remark");
    }

    #[test]
    fn test_zero_init_without_zero_numeral() {
        let mut s = settings(TheoremKind::Theorem, Some(0));
        s.config.number_init = 0;
        s.config.number_style = NumberStyle::RomanUpper;
        assert_eq!(format_title(&s, true), "Theorem 0");
        s.index = Some(1);
        assert_eq!(format_title(&s, true), "Theorem I");
    }

    #[test]
    fn test_huge_init_falls_back() {
        let mut s = settings(TheoremKind::Lemma, Some(1));
        s.config.number_init = usize::MAX;
        assert_eq!(format_title(&s, true), "Lemma 2");

        let mut config = ResolvedConfig::default();
        config.eq_number_init = usize::MAX;
        assert_eq!(format_equation_tag(&config, 1), "2");
    }

    #[test]
    fn test_label() {
        let mut s = settings(TheoremKind::Theorem, Some(0));
        assert_eq!(format_label(&s), None);
        s.label = Some("pythagorean-theorem".to_string());
        s.config.label_prefix = "geometry:".to_string();
        assert_eq!(format_label(&s).as_deref(), Some("geometry:thm:pythagorean-theorem"));
    }

    #[test]
    fn test_reference_formats() {
        let mut s = settings(TheoremKind::Theorem, Some(0));
        s.title = Some("Pythagoras".to_string());
        assert_eq!(format_reference(&s), "Theorem 1 (Pythagoras)");
        s.config.ref_format = RefFormat::TypeNumber;
        assert_eq!(format_reference(&s), "Theorem 1");
        s.config.ref_format = RefFormat::TitleOrTypeNumber;
        assert_eq!(format_reference(&s), "Pythagoras");
        s.title = None;
        assert_eq!(format_reference(&s), "Theorem 1");
    }

    #[test]
    fn test_equation_tag_and_reference() {
        let mut config = ResolvedConfig::default();
        assert_eq!(format_equation_tag(&config, 0), "1");
        config.eq_number_prefix = "2.".to_string();
        config.eq_number_style = NumberStyle::AlphLower;
        config.eq_ref_prefix = "Eq. ".to_string();
        let tag = format_equation_tag(&config, 1);
        assert_eq!(tag, "2.b");
        assert_eq!(format_equation_reference(&config, &tag), "Eq. (2.b)");
    }
}
