//! Configuration model
//!
//! A [`Configuration`] is the partial set of options stored at one
//! location; every field is optional. A [`ResolvedConfig`] is the fully
//! populated result of layering configurations over the global defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_NUMBER_INIT, NUMBER_AUTO, PROFILE_ENGLISH};
use crate::error::{Error, Result};
use crate::kind::TheoremKind;
use crate::numeral::NumberStyle;

/// Visual style of math callouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutStyle {
    #[default]
    Framed,
    Plain,
    Vivid,
    Mathwiki,
    Custom,
}

/// How a reference to a math callout is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RefFormat {
    /// `Theorem 1 (Pythagoras)`
    #[default]
    #[serde(rename = "[type] [number] ([title])")]
    TypeNumberTitle,
    /// `Theorem 1`
    #[serde(rename = "[type] [number]")]
    TypeNumber,
    /// `Pythagoras`, or `Theorem 1` when the block has no title
    #[serde(rename = "[title] if title exists, [type] [number] otherwise")]
    TitleOrTypeNumber,
}

/// Option names in their on-disk (camelCase) spelling
pub const OPTION_KEYS: [&str; 20] = [
    "lang",
    "mathCalloutStyle",
    "mathCalloutFontInherit",
    "titleSuffix",
    "labelPrefix",
    "rename",
    "numberPrefix",
    "numberSuffix",
    "numberInit",
    "numberStyle",
    "numberDefault",
    "refFormat",
    "eqNumberPrefix",
    "eqNumberSuffix",
    "eqNumberInit",
    "eqNumberStyle",
    "eqRefPrefix",
    "eqRefSuffix",
    "lineByLine",
    "profile",
];

/// Partial configuration stored at a single location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math_callout_style: Option<CalloutStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math_callout_font_inherit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rename: Option<BTreeMap<TheoremKind, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_init: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_style: Option<NumberStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_format: Option<RefFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_number_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_number_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_number_init: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_number_style: Option<NumberStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_ref_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eq_ref_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_by_line: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Copy every field `$src` defines onto `$dst`. The target field is
/// either `T` or `Option<T>`; `into()` covers both.
macro_rules! overlay {
    ($dst:expr, $src:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(value) = &$src.$field {
                $dst.$field = value.clone().into();
            }
        )*
    };
}

impl Configuration {
    /// Whether no option is set
    pub fn is_empty(&self) -> bool {
        self == &Configuration::default()
    }

    /// Shallow-merge `other` over `self`; defined keys in `other` win.
    pub fn merge(&mut self, other: &Configuration) {
        overlay!(self, other;
            lang, math_callout_style, math_callout_font_inherit, title_suffix, label_prefix,
            rename, number_prefix, number_suffix, number_init, number_style, number_default,
            ref_format, eq_number_prefix, eq_number_suffix, eq_number_init, eq_number_style,
            eq_ref_prefix, eq_ref_suffix, line_by_line, profile,
        );
    }

    /// Read a single option as JSON, `None` when unset.
    pub fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        check_key(key)?;
        let object = serde_json::to_value(self)?;
        Ok(object.get(key).cloned())
    }

    /// Set a single option from user input.
    ///
    /// `raw` is parsed as JSON when possible (`2`, `true`, `{"theorem":"Thm"}`)
    /// and taken as a plain string otherwise (`roman`, `.`).
    pub fn set(&mut self, key: &str, raw: &str) -> Result<()> {
        check_key(key)?;
        let parsed = serde_json::from_str::<serde_json::Value>(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

        // "1" for a string option is a literal, not a number.
        let updated = match self.with_value(key, parsed.clone()) {
            Ok(updated) => updated,
            Err(_) if !parsed.is_string() => {
                self.with_value(key, serde_json::Value::String(raw.to_string()))?
            }
            Err(e) => return Err(e),
        };

        if updated.get(key)?.is_none() {
            return Err(Error::InvalidValue {
                key: key.to_string(),
                reason: format!("'{}' was not accepted", raw),
            });
        }
        *self = updated;
        Ok(())
    }

    fn with_value(&self, key: &str, value: serde_json::Value) -> Result<Configuration> {
        let mut object = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        object.insert(key.to_string(), value);
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| Error::InvalidValue {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    /// Remove a single option.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        check_key(key)?;
        let mut object = match serde_json::to_value(&*self)? {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        object.remove(key);
        *self = serde_json::from_value(serde_json::Value::Object(object))?;
        Ok(())
    }
}

fn check_key(key: &str) -> Result<()> {
    if !OPTION_KEYS.contains(&key) {
        return Err(Error::UnknownKey(key.to_string()));
    }
    Ok(())
}

/// Fully populated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub lang: String,
    pub math_callout_style: CalloutStyle,
    pub math_callout_font_inherit: bool,
    pub title_suffix: String,
    pub label_prefix: String,
    pub rename: BTreeMap<TheoremKind, String>,
    pub number_prefix: String,
    pub number_suffix: String,
    pub number_init: usize,
    pub number_style: NumberStyle,
    pub number_default: String,
    pub ref_format: RefFormat,
    pub eq_number_prefix: String,
    pub eq_number_suffix: String,
    pub eq_number_init: usize,
    pub eq_number_style: NumberStyle,
    pub eq_ref_prefix: String,
    pub eq_ref_suffix: String,
    pub line_by_line: bool,
    pub profile: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            math_callout_style: CalloutStyle::Framed,
            math_callout_font_inherit: false,
            title_suffix: ".".to_string(),
            label_prefix: String::new(),
            rename: BTreeMap::new(),
            number_prefix: String::new(),
            number_suffix: String::new(),
            number_init: DEFAULT_NUMBER_INIT,
            number_style: NumberStyle::Arabic,
            number_default: NUMBER_AUTO.to_string(),
            ref_format: RefFormat::TypeNumberTitle,
            eq_number_prefix: String::new(),
            eq_number_suffix: String::new(),
            eq_number_init: DEFAULT_NUMBER_INIT,
            eq_number_style: NumberStyle::Arabic,
            eq_ref_prefix: String::new(),
            eq_ref_suffix: String::new(),
            line_by_line: true,
            profile: PROFILE_ENGLISH.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Overlay a partial configuration; defined keys win.
    pub fn apply(&mut self, layer: &Configuration) {
        overlay!(self, layer;
            lang, math_callout_style, math_callout_font_inherit, title_suffix, label_prefix,
            rename, number_prefix, number_suffix, number_init, number_style, number_default,
            ref_format, eq_number_prefix, eq_number_suffix, eq_number_init, eq_number_style,
            eq_ref_prefix, eq_ref_suffix, line_by_line, profile,
        );
    }
}

impl From<ResolvedConfig> for Configuration {
    fn from(full: ResolvedConfig) -> Self {
        Self {
            lang: Some(full.lang),
            math_callout_style: Some(full.math_callout_style),
            math_callout_font_inherit: Some(full.math_callout_font_inherit),
            title_suffix: Some(full.title_suffix),
            label_prefix: Some(full.label_prefix),
            rename: Some(full.rename),
            number_prefix: Some(full.number_prefix),
            number_suffix: Some(full.number_suffix),
            number_init: Some(full.number_init),
            number_style: Some(full.number_style),
            number_default: Some(full.number_default),
            ref_format: Some(full.ref_format),
            eq_number_prefix: Some(full.eq_number_prefix),
            eq_number_suffix: Some(full.eq_number_suffix),
            eq_number_init: Some(full.eq_number_init),
            eq_number_style: Some(full.eq_number_style),
            eq_ref_prefix: Some(full.eq_ref_prefix),
            eq_ref_suffix: Some(full.eq_ref_suffix),
            line_by_line: Some(full.line_by_line),
            profile: Some(full.profile),
        }
    }
}
