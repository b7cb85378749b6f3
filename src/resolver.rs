//! Settings resolution
//!
//! Layers the configurations stored along a location's ancestor chain
//! over the global defaults (nearest location wins), then applies the
//! block's own overrides. Resolution is pure: it reads the state and
//! returns a fresh value.

use tracing::debug;

use crate::block::CalloutSettings;
use crate::config::{Configuration, ResolvedConfig};
use crate::kind::TheoremKind;
use crate::location::Location;
use crate::profile::english_name;
use crate::state::PluginState;

/// Effective configuration for a location, optionally overridden by a block
pub fn resolve_config(
    state: &PluginState,
    location: &Location,
    block_override: Option<&Configuration>,
) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();
    for ancestor in location.ancestors() {
        if let Some(layer) = state.settings(&ancestor) {
            resolved.apply(layer);
        }
    }
    if let Some(layer) = block_override {
        resolved.apply(layer);
    }
    resolved
}

/// Display name of a kind under a resolved configuration: the active
/// profile's string, replaced by a non-empty `rename` entry.
pub fn display_name(state: &PluginState, config: &ResolvedConfig, kind: TheoremKind) -> String {
    if let Some(renamed) = config.rename.get(&kind).filter(|name| !name.is_empty()) {
        return renamed.clone();
    }
    match state.profile(&config.profile) {
        Some(profile) => profile.display_name(kind).to_string(),
        None => {
            debug!(profile = %config.profile, "profile missing, using English names");
            english_name(kind).to_string()
        }
    }
}

/// Everything needed to render one math callout
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub config: ResolvedConfig,
    pub kind: TheoremKind,
    /// Display name of `kind`
    pub type_name: String,
    /// `"auto"`, a literal number, or empty for unnumbered
    pub number: String,
    pub title: Option<String>,
    pub label: Option<String>,
    /// Sequence index injected by the indexer
    pub index: Option<usize>,
}

/// Resolve a callout's settings at a location. `index` is the live
/// sequence index, when one has been assigned.
pub fn resolve_settings(
    state: &PluginState,
    location: &Location,
    block: &CalloutSettings,
    index: Option<usize>,
) -> ResolvedSettings {
    let config = resolve_config(state, location, Some(&block.overrides));
    let type_name = display_name(state, &config, block.kind);
    let number = block
        .number
        .clone()
        .unwrap_or_else(|| config.number_default.clone());

    ResolvedSettings {
        kind: block.kind,
        type_name,
        number,
        title: block.title.clone().filter(|t| !t.is_empty()),
        label: block.label.clone().filter(|l| !l.is_empty()),
        index,
        config,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPTION_KEYS;
    use crate::numeral::NumberStyle;

    fn state() -> PluginState {
        let mut state = PluginState::default();
        state.settings_mut(&Location::root()).number_init = Some(1);
        state.settings_mut(&Location::new("algebra")).number_init = Some(2);
        state
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let state = state();
        let inside = resolve_config(&state, &Location::new("algebra/groups.md"), None);
        let outside = resolve_config(&state, &Location::new("analysis/limits.md"), None);
        assert_eq!(inside.number_init, 2);
        assert_eq!(outside.number_init, 1);
    }

    #[test]
    fn test_file_level_beats_folder() {
        let mut state = state();
        state.settings_mut(&Location::new("algebra/groups.md")).number_init = Some(5);
        let resolved = resolve_config(&state, &Location::new("algebra/groups.md"), None);
        assert_eq!(resolved.number_init, 5);
    }

    #[test]
    fn test_block_override_wins() {
        let state = state();
        let block = Configuration {
            number_init: Some(10),
            number_style: Some(NumberStyle::RomanUpper),
            ..Default::default()
        };
        let resolved = resolve_config(&state, &Location::new("algebra/groups.md"), Some(&block));
        assert_eq!(resolved.number_init, 10);
        assert_eq!(resolved.number_style, NumberStyle::RomanUpper);
    }

    #[test]
    fn test_every_option_populated() {
        let state = state();
        for path in ["/", "algebra", "algebra/groups.md", "x/y/z.md"] {
            let resolved = resolve_config(&state, &Location::new(path), None);
            let object = serde_json::to_value(&resolved).unwrap();
            for key in OPTION_KEYS {
                assert!(object.get(key).is_some(), "{} lacks {}", path, key);
            }
        }
    }

    #[test]
    fn test_empty_state_resolves_to_defaults() {
        let state = PluginState::default();
        let resolved = resolve_config(&state, &Location::new("notes.md"), None);
        assert_eq!(resolved, ResolvedConfig::default());
    }

    #[test]
    fn test_display_name_profile_and_rename() {
        let mut state = PluginState::default();
        state.settings_mut(&Location::new("ja")).profile = Some("Japanese".to_string());
        let ja = resolve_config(&state, &Location::new("ja/a.md"), None);
        assert_eq!(display_name(&state, &ja, TheoremKind::Lemma), "補題");

        let mut renamed = ja.clone();
        renamed.rename.insert(TheoremKind::Lemma, "Hilfssatz".to_string());
        assert_eq!(display_name(&state, &renamed, TheoremKind::Lemma), "Hilfssatz");
        assert_eq!(display_name(&state, &renamed, TheoremKind::Theorem), "定理");
    }

    #[test]
    fn test_resolve_settings_number_default() {
        let mut state = PluginState::default();
        state.settings_mut(&Location::new("drafts")).number_default = Some(String::new());
        let block = CalloutSettings::new(TheoremKind::Remark);

        let numbered = resolve_settings(&state, &Location::new("notes.md"), &block, Some(0));
        assert_eq!(numbered.number, "auto");
        let plain = resolve_settings(&state, &Location::new("drafts/a.md"), &block, None);
        assert_eq!(plain.number, "");
        assert_eq!(plain.type_name, "Remark");
    }
}
