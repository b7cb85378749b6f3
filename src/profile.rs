//! Display-name profiles
//!
//! A profile maps every theorem-like kind to a display string
//! ("Theorem", "定理", ...). The body is an array indexed by kind so a
//! profile can never lack an entry.

use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::constants::{PROFILE_ENGLISH, PROFILE_JAPANESE};
use crate::error::{Error, Result};
use crate::kind::TheoremKind;

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z-]+$").unwrap());

/// Display string for each kind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileBody([String; TheoremKind::COUNT]);

impl ProfileBody {
    /// Build a body from a per-kind function
    pub fn from_fn(mut f: impl FnMut(TheoremKind) -> String) -> Self {
        ProfileBody(std::array::from_fn(|i| f(TheoremKind::ALL[i])))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TheoremKind, &str)> {
        TheoremKind::ALL.into_iter().zip(self.0.iter().map(String::as_str))
    }
}

impl Index<TheoremKind> for ProfileBody {
    type Output = String;

    fn index(&self, kind: TheoremKind) -> &String {
        &self.0[kind.index()]
    }
}

impl IndexMut<TheoremKind> for ProfileBody {
    fn index_mut(&mut self, kind: TheoremKind) -> &mut String {
        &mut self.0[kind.index()]
    }
}

impl Serialize for ProfileBody {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TheoremKind::COUNT))?;
        for (kind, name) in self.iter() {
            map.serialize_entry(kind.as_str(), name)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProfileBody {
    /// Kinds missing from stored data get an empty display string.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<TheoremKind, String>::deserialize(deserializer)?;
        Ok(ProfileBody::from_fn(|kind| raw.get(&kind).cloned().unwrap_or_default()))
    }
}

/// Profile metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileMeta {
    /// Short tags such as language codes
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named table of display strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub meta: ProfileMeta,
    pub body: ProfileBody,
}

impl Profile {
    /// Empty profile: no tags, every kind mapped to `""`
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            meta: ProfileMeta::default(),
            body: ProfileBody::default(),
        }
    }

    pub fn display_name(&self, kind: TheoremKind) -> &str {
        &self.body[kind]
    }
}

/// The English and Japanese profiles shipped by default
pub fn builtin_profiles() -> BTreeMap<String, Profile> {
    let english = Profile {
        id: PROFILE_ENGLISH.to_string(),
        meta: ProfileMeta { tags: vec!["en".to_string()] },
        body: ProfileBody::from_fn(|kind| english_name(kind).to_string()),
    };
    let japanese = Profile {
        id: PROFILE_JAPANESE.to_string(),
        meta: ProfileMeta { tags: vec!["ja".to_string()] },
        body: ProfileBody::from_fn(|kind| japanese_name(kind).to_string()),
    };

    BTreeMap::from([
        (english.id.clone(), english),
        (japanese.id.clone(), japanese),
    ])
}

/// Display name used when a configured profile cannot be found
pub fn english_name(kind: TheoremKind) -> &'static str {
    match kind {
        TheoremKind::Axiom => "Axiom",
        TheoremKind::Definition => "Definition",
        TheoremKind::Lemma => "Lemma",
        TheoremKind::Proposition => "Proposition",
        TheoremKind::Theorem => "Theorem",
        TheoremKind::Corollary => "Corollary",
        TheoremKind::Claim => "Claim",
        TheoremKind::Assumption => "Assumption",
        TheoremKind::Example => "Example",
        TheoremKind::Exercise => "Exercise",
        TheoremKind::Conjecture => "Conjecture",
        TheoremKind::Hypothesis => "Hypothesis",
        TheoremKind::Remark => "Remark",
    }
}

fn japanese_name(kind: TheoremKind) -> &'static str {
    match kind {
        TheoremKind::Axiom => "公理",
        TheoremKind::Definition => "定義",
        TheoremKind::Lemma => "補題",
        TheoremKind::Proposition => "命題",
        TheoremKind::Theorem => "定理",
        TheoremKind::Corollary => "系",
        TheoremKind::Claim => "主張",
        TheoremKind::Assumption => "仮定",
        TheoremKind::Example => "例",
        TheoremKind::Exercise => "演習問題",
        TheoremKind::Conjecture => "予想",
        TheoremKind::Hypothesis => "仮説",
        TheoremKind::Remark => "注意",
    }
}

/// Validate a single tag: lowercase letters and hyphens, or empty
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() || TAG_PATTERN.is_match(tag) {
        Ok(())
    } else {
        Err(Error::InvalidTag(tag.to_string()))
    }
}

/// Parse comma-separated tag input, dropping empty entries
pub fn parse_tags(input: &str) -> Result<Vec<String>> {
    let mut tags = Vec::new();
    for tag in input.split(',').map(str::trim) {
        validate_tag(tag)?;
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_total() {
        let profiles = builtin_profiles();
        assert_eq!(profiles.len(), 2);
        for profile in profiles.values() {
            for kind in TheoremKind::ALL {
                assert!(!profile.display_name(kind).is_empty());
            }
        }
        assert_eq!(profiles[PROFILE_JAPANESE].display_name(TheoremKind::Theorem), "定理");
        assert_eq!(profiles[PROFILE_ENGLISH].meta.tags, vec!["en"]);
    }

    #[test]
    fn test_empty_profile() {
        let profile = Profile::empty("Mine");
        assert!(profile.meta.tags.is_empty());
        assert_eq!(profile.body.iter().count(), TheoremKind::COUNT);
        assert!(profile.body.iter().all(|(_, name)| name.is_empty()));
    }

    #[test]
    fn test_body_serializes_as_map() {
        let mut body = ProfileBody::default();
        body[TheoremKind::Lemma] = "Lem".to_string();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["lemma"], "Lem");
        assert_eq!(json["theorem"], "");
        assert_eq!(json.as_object().unwrap().len(), TheoremKind::COUNT);
    }

    #[test]
    fn test_body_fills_missing_kinds() {
        let body: ProfileBody = serde_json::from_str(r#"{"theorem":"Thm"}"#).unwrap();
        assert_eq!(body[TheoremKind::Theorem], "Thm");
        assert_eq!(body[TheoremKind::Remark], "");
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("en").is_ok());
        assert!(validate_tag("zh-hans").is_ok());
        assert!(validate_tag("").is_ok());
        assert!(matches!(validate_tag("EN"), Err(Error::InvalidTag(_))));
        assert!(validate_tag("en_us").is_err());
        assert!(validate_tag("ja1").is_err());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("en, en-gb,, en").unwrap(), vec!["en", "en-gb"]);
        assert!(parse_tags("en, Fr").is_err());
        assert!(parse_tags("").unwrap().is_empty());
    }
}
