//! Theorem-like environment kinds
//!
//! The vocabulary is closed: every profile carries a display name for
//! each kind and every label is namespaced by the kind's short prefix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A theorem-like environment kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TheoremKind {
    Axiom,
    Definition,
    Lemma,
    Proposition,
    Theorem,
    Corollary,
    Claim,
    Assumption,
    Example,
    Exercise,
    Conjecture,
    Hypothesis,
    Remark,
}

impl TheoremKind {
    pub const COUNT: usize = 13;

    pub const ALL: [TheoremKind; TheoremKind::COUNT] = [
        TheoremKind::Axiom,
        TheoremKind::Definition,
        TheoremKind::Lemma,
        TheoremKind::Proposition,
        TheoremKind::Theorem,
        TheoremKind::Corollary,
        TheoremKind::Claim,
        TheoremKind::Assumption,
        TheoremKind::Example,
        TheoremKind::Exercise,
        TheoremKind::Conjecture,
        TheoremKind::Hypothesis,
        TheoremKind::Remark,
    ];

    /// Position in `ALL`
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TheoremKind::Axiom => "axiom",
            TheoremKind::Definition => "definition",
            TheoremKind::Lemma => "lemma",
            TheoremKind::Proposition => "proposition",
            TheoremKind::Theorem => "theorem",
            TheoremKind::Corollary => "corollary",
            TheoremKind::Claim => "claim",
            TheoremKind::Assumption => "assumption",
            TheoremKind::Example => "example",
            TheoremKind::Exercise => "exercise",
            TheoremKind::Conjecture => "conjecture",
            TheoremKind::Hypothesis => "hypothesis",
            TheoremKind::Remark => "remark",
        }
    }

    /// Short tag used to namespace labels, e.g. `thm` in `thm:pythagoras`
    pub fn label_prefix(self) -> &'static str {
        match self {
            TheoremKind::Axiom => "axm",
            TheoremKind::Definition => "def",
            TheoremKind::Lemma => "lem",
            TheoremKind::Proposition => "prp",
            TheoremKind::Theorem => "thm",
            TheoremKind::Corollary => "cor",
            TheoremKind::Claim => "clm",
            TheoremKind::Assumption => "ass",
            TheoremKind::Example => "exm",
            TheoremKind::Exercise => "exr",
            TheoremKind::Conjecture => "cnj",
            TheoremKind::Hypothesis => "hyp",
            TheoremKind::Remark => "rmk",
        }
    }
}

impl fmt::Display for TheoremKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TheoremKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        TheoremKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
            .ok_or_else(|| Error::InvalidValue {
                key: "type".to_string(),
                reason: format!("'{}' is not a theorem-like environment", s),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, kind) in TheoremKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_label_prefixes_are_unique() {
        let mut prefixes: Vec<_> = TheoremKind::ALL.iter().map(|k| k.label_prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), TheoremKind::COUNT);
        assert_eq!(TheoremKind::Theorem.label_prefix(), "thm");
    }

    #[test]
    fn test_parse() {
        assert_eq!("Lemma".parse::<TheoremKind>().unwrap(), TheoremKind::Lemma);
        assert!("proof".parse::<TheoremKind>().is_err());
        let kind: TheoremKind = serde_json::from_str("\"corollary\"").unwrap();
        assert_eq!(kind, TheoremKind::Corollary);
    }
}
