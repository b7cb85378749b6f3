//! Persisted plugin state
//!
//! Two blobs make up the state: [`PluginData`] (per-location settings and
//! excluded files) and [`ExtraData`] (profiles).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Configuration, ResolvedConfig};
use crate::constants::{PROFILE_ENGLISH, ROOT_LOCATION};
use crate::location::Location;
use crate::profile::{builtin_profiles, Profile};

/// `{ settings, excludedFiles }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginData {
    /// Partial configuration per location path; `/` is the root
    pub settings: BTreeMap<String, Configuration>,
    /// Locations excluded from indexing (files or folders)
    pub excluded_files: Vec<String>,
}

/// `{ profiles }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraData {
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for ExtraData {
    fn default() -> Self {
        Self {
            profiles: builtin_profiles(),
        }
    }
}

/// In-memory snapshot of both blobs
#[derive(Debug, Clone, PartialEq)]
pub struct PluginState {
    pub data: PluginData,
    pub extra: ExtraData,
}

impl Default for PluginState {
    fn default() -> Self {
        Self::new(PluginData::default(), ExtraData::default())
    }
}

impl PluginState {
    pub fn new(data: PluginData, extra: ExtraData) -> Self {
        let mut state = Self { data, extra };
        state.ensure_root_defaults();
        state
    }

    /// Fill every option missing at the root from the global defaults.
    /// Stored root values win over defaults.
    pub fn ensure_root_defaults(&mut self) {
        let mut root = Configuration::from(ResolvedConfig::default());
        if let Some(stored) = self.data.settings.get(ROOT_LOCATION) {
            root.merge(stored);
        }
        if !self.extra.profiles.contains_key(root.profile.as_deref().unwrap_or_default()) {
            root.profile = Some(self.fallback_profile());
        }
        self.data.settings.insert(ROOT_LOCATION.to_string(), root);
    }

    /// Profile the root falls back to when its own is gone: English if
    /// present, else the first remaining id.
    pub fn fallback_profile(&self) -> String {
        if self.extra.profiles.contains_key(PROFILE_ENGLISH) {
            return PROFILE_ENGLISH.to_string();
        }
        self.extra
            .profiles
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| PROFILE_ENGLISH.to_string())
    }

    /// Stored partial configuration for a location
    pub fn settings(&self, location: &Location) -> Option<&Configuration> {
        self.data.settings.get(location.as_str())
    }

    /// Stored partial configuration for a location, created on demand
    pub fn settings_mut(&mut self, location: &Location) -> &mut Configuration {
        self.data
            .settings
            .entry(location.as_str().to_string())
            .or_default()
    }

    /// Whether a location is at or below an excluded location
    pub fn is_excluded(&self, location: &Location) -> bool {
        self.data
            .excluded_files
            .iter()
            .any(|excluded| location.is_within(&Location::new(excluded)))
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.extra.profiles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPTION_KEYS;

    #[test]
    fn test_new_populates_root() {
        let state = PluginState::new(PluginData::default(), ExtraData::default());
        let root = state.settings(&Location::root()).unwrap();
        for key in OPTION_KEYS {
            assert!(root.get(key).unwrap().is_some(), "root lacks {}", key);
        }
    }

    #[test]
    fn test_stored_root_values_win() {
        let mut data = PluginData::default();
        data.settings.insert(
            ROOT_LOCATION.to_string(),
            Configuration {
                title_suffix: Some(":".to_string()),
                ..Default::default()
            },
        );
        let state = PluginState::new(data, ExtraData::default());
        let root = state.settings(&Location::root()).unwrap();
        assert_eq!(root.title_suffix.as_deref(), Some(":"));
        assert_eq!(root.number_init, Some(1));
    }

    #[test]
    fn test_root_profile_repaired() {
        let mut data = PluginData::default();
        data.settings.insert(
            ROOT_LOCATION.to_string(),
            Configuration {
                profile: Some("Gone".to_string()),
                ..Default::default()
            },
        );
        let state = PluginState::new(data, ExtraData::default());
        let root = state.settings(&Location::root()).unwrap();
        assert_eq!(root.profile.as_deref(), Some(PROFILE_ENGLISH));
    }

    #[test]
    fn test_is_excluded() {
        let mut state = PluginState::default();
        state.data.excluded_files.push("templates".to_string());
        assert!(state.is_excluded(&Location::new("templates/theorem.md")));
        assert!(!state.is_excluded(&Location::new("templates2/theorem.md")));
        assert!(!state.is_excluded(&Location::new("notes.md")));
    }

    #[test]
    fn test_plugin_data_json_shape() {
        let json = r#"{"settings":{"math":{"numberStyle":"roman"}},"excludedFiles":["drafts"]}"#;
        let data: PluginData = serde_json::from_str(json).unwrap();
        assert_eq!(data.excluded_files, vec!["drafts"]);
        assert!(data.settings["math"].number_style.is_some());
    }
}
