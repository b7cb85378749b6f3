//! Numeral formatting
//!
//! Converts sequence numbers into arabic, alphabetic or roman text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Textual style of a sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NumberStyle {
    /// 1, 2, 3
    #[default]
    #[serde(rename = "arabic")]
    Arabic,
    /// a, b, c
    #[serde(rename = "alph")]
    AlphLower,
    /// A, B, C
    #[serde(rename = "Alph")]
    AlphUpper,
    /// i, ii, iii
    #[serde(rename = "roman")]
    RomanLower,
    /// I, II, III
    #[serde(rename = "Roman")]
    RomanUpper,
}

impl NumberStyle {
    pub const ALL: [NumberStyle; 5] = [
        NumberStyle::Arabic,
        NumberStyle::AlphLower,
        NumberStyle::AlphUpper,
        NumberStyle::RomanLower,
        NumberStyle::RomanUpper,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NumberStyle::Arabic => "arabic",
            NumberStyle::AlphLower => "alph",
            NumberStyle::AlphUpper => "Alph",
            NumberStyle::RomanLower => "roman",
            NumberStyle::RomanUpper => "Roman",
        }
    }
}

impl fmt::Display for NumberStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumberStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumberStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| Error::InvalidValue {
                key: "numberStyle".to_string(),
                reason: format!("'{}' is not one of arabic, alph, Alph, roman, Roman", s),
            })
    }
}

/// Subtractive roman numeral table, largest first
const ROMAN_TABLE: [(usize, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Convert `n` into the given style.
///
/// `Arabic` accepts any value including 0. The alphabetic and roman
/// styles have no representation for 0 and panic on it.
pub fn convert(n: usize, style: NumberStyle) -> String {
    match style {
        NumberStyle::Arabic => n.to_string(),
        NumberStyle::AlphLower => to_alph(n),
        NumberStyle::AlphUpper => to_alph(n).to_uppercase(),
        NumberStyle::RomanLower => to_roman(n).to_lowercase(),
        NumberStyle::RomanUpper => to_roman(n),
    }
}

/// Bijective base-26: 1 -> a, 26 -> z, 27 -> aa
fn to_alph(n: usize) -> String {
    assert!(n > 0, "alphabetic numbering starts at 1, got {}", n);

    let mut n = n;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

fn to_roman(n: usize) -> String {
    assert!(n > 0, "roman numbering starts at 1, got {}", n);

    let mut n = n;
    let mut out = String::new();
    for (value, symbol) in ROMAN_TABLE {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}
