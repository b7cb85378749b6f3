//! Locations in the vault hierarchy
//!
//! A location is a vault-relative file or folder path with forward
//! slashes. The root is the reserved `/` and is never a regular node.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ROOT_LOCATION;

/// A file or folder in the vault, identified by its normalized path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Location(String);

impl Location {
    /// The root location
    pub fn root() -> Self {
        Location(ROOT_LOCATION.to_string())
    }

    /// Normalize a path: backslashes to slashes, no `.`/empty segments,
    /// no leading or trailing slash. An empty result is the root.
    pub fn new(path: &str) -> Self {
        let segments: Vec<&str> = path
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.is_empty() {
            Self::root()
        } else {
            Location(segments.join("/"))
        }
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_LOCATION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment (`""` for the root)
    pub fn name(&self) -> &str {
        if self.is_root() {
            return "";
        }
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Parent location; `None` only for the root
    pub fn parent(&self) -> Option<Location> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind('/') {
            Some(pos) => Some(Location(self.0[..pos].to_string())),
            None => Some(Self::root()),
        }
    }

    /// Ancestor chain from the root down to `self`, inclusive
    pub fn ancestors(&self) -> Vec<Location> {
        let mut chain = vec![self.clone()];
        let mut current = self.parent();
        while let Some(location) = current {
            current = location.parent();
            chain.push(location);
        }
        chain.reverse();
        chain
    }

    /// Whether `self` is `other` or lies below it
    pub fn is_within(&self, other: &Location) -> bool {
        other.is_root()
            || self == other
            || (self.0.starts_with(&other.0) && self.0[other.0.len()..].starts_with('/'))
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Location::new(&path)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::new(path)
    }
}

impl From<Location> for String {
    fn from(location: Location) -> Self {
        location.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
