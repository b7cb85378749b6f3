//! CalloutEngine - persistent math callout operations
//!
//! Owns the store, the loaded state and the optional link index, and
//! provides:
//! - configuration resolution and editing by key
//! - profile registry operations
//! - excluded-file management
//! - document indexing and dependent lookup
//!
//! Mutations run against a copy of the state; only a successful
//! operation replaces the state and saves it, so a failed call leaves
//! both the state and the store untouched.

use std::cell::Cell;
use std::ops::Deref;

use tracing::{debug, info, warn};

use crate::config::{Configuration, ResolvedConfig};
use crate::constants::ERROR_ROOT_UNSET;
use crate::error::{Error, Result};
use crate::indexer::{IndexedDocument, Indexer, RenderSink};
use crate::kind::TheoremKind;
use crate::links::LinkIndex;
use crate::location::Location;
use crate::registry::DeletePlan;
use crate::resolver::resolve_config;
use crate::state::PluginState;
use crate::store::{load_state, save_state, Store};

/// Name reported when no link index is attached
const LINK_INDEX: &str = "link index";

// === CalloutEngine ===

/// Core engine over a [`Store`]
pub struct CalloutEngine<S: Store> {
    store: S,
    state: PluginState,
    link_index: Option<Box<dyn LinkIndex>>,
    missing_links_reported: Cell<bool>,
}

impl<S: Store> CalloutEngine<S> {
    /// Load state from the store; missing blobs load as defaults
    pub fn load(store: S) -> Result<Self> {
        let state = load_state(&store)?;
        debug!(
            locations = state.data.settings.len(),
            profiles = state.extra.profiles.len(),
            "loaded state"
        );
        Ok(Self {
            store,
            state,
            link_index: None,
            missing_links_reported: Cell::new(false),
        })
    }

    /// Attach a link index for dependent lookups
    pub fn with_link_index(mut self, index: impl LinkIndex + 'static) -> Self {
        self.link_index = Some(Box::new(index));
        self
    }

    pub fn state(&self) -> &PluginState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run `op` on a copy of the state; commit and save only on success
    fn transact<T>(&mut self, op: impl FnOnce(&mut PluginState) -> Result<T>) -> Result<T> {
        let mut draft = self.state.clone();
        let value = op(&mut draft)?;
        save_state(&mut self.store, &draft)?;
        self.state = draft;
        Ok(value)
    }

    // === Configuration ===

    /// Fully resolved configuration at a location
    pub fn resolve(&self, location: &Location) -> ResolvedConfig {
        resolve_config(&self.state, location, None)
    }

    /// Resolved configuration with a block override applied last
    pub fn resolve_with(&self, location: &Location, block: &Configuration) -> ResolvedConfig {
        resolve_config(&self.state, location, Some(block))
    }

    /// Set one option at a location from user input
    pub fn set_option(&mut self, location: &Location, key: &str, raw: &str) -> Result<()> {
        self.transact(|state| {
            let settings = state.settings_mut(location);
            settings.set(key, raw)?;
            if let Some(profile) = settings.profile.clone() {
                if state.profile(&profile).is_none() {
                    return Err(Error::ProfileNotFound(profile));
                }
            }
            Ok(())
        })?;
        info!(location = %location, key, value = raw, "set option");
        Ok(())
    }

    /// Remove one option at a non-root location
    pub fn unset_option(&mut self, location: &Location, key: &str) -> Result<()> {
        if location.is_root() {
            return Err(Error::InvalidValue {
                key: key.to_string(),
                reason: ERROR_ROOT_UNSET.to_string(),
            });
        }
        self.transact(|state| {
            let path = location.as_str();
            if let Some(settings) = state.data.settings.get_mut(path) {
                settings.unset(key)?;
                if settings.is_empty() {
                    state.data.settings.remove(path);
                }
            } else {
                // Still validate the key
                Configuration::default().unset(key)?;
            }
            Ok(())
        })?;
        info!(location = %location, key, "unset option");
        Ok(())
    }

    // === Profiles ===

    pub fn add_profile(&mut self, id: &str) -> Result<()> {
        self.transact(|state| state.profiles().add(id).map(|_| ()))
    }

    /// Rename a profile; returns the locations that were repointed
    pub fn rename_profile(&mut self, old_id: &str, new_id: &str) -> Result<Vec<String>> {
        self.transact(|state| state.profiles().rename(old_id, new_id))
    }

    /// Copy a profile; returns the new id
    pub fn copy_profile(&mut self, id: &str) -> Result<String> {
        self.transact(|state| state.profiles().copy(id))
    }

    /// First phase of deletion; nothing changes until [`commit_delete`]
    ///
    /// [`commit_delete`]: Self::commit_delete
    pub fn plan_delete(&mut self, id: &str) -> Result<DeletePlan> {
        self.state.profiles().plan_delete(id)
    }

    /// Second phase of deletion: repoint (or unset) references and remove
    pub fn commit_delete(&mut self, plan: DeletePlan, replacement: Option<&str>) -> Result<Vec<String>> {
        self.transact(|state| state.profiles().commit_delete(plan, replacement))
    }

    /// One-step deletion of an unreferenced profile
    pub fn delete_profile(&mut self, id: &str) -> Result<()> {
        self.transact(|state| state.profiles().delete(id))
    }

    pub fn set_profile_tags(&mut self, id: &str, input: &str) -> Result<()> {
        self.transact(|state| state.profiles().set_tags(id, input))
    }

    pub fn set_display_name(&mut self, id: &str, kind: TheoremKind, name: &str) -> Result<()> {
        self.transact(|state| state.profiles().set_display_name(id, kind, name))
    }

    // === Excluded Files ===

    /// Exclude a location from indexing; `false` if already excluded
    pub fn exclude(&mut self, location: &Location) -> Result<bool> {
        if self.state.data.excluded_files.iter().any(|e| e == location.as_str()) {
            return Ok(false);
        }
        self.transact(|state| {
            state.data.excluded_files.push(location.as_str().to_string());
            state.data.excluded_files.sort();
            Ok(true)
        })
    }

    /// Remove an exclusion; `false` if it was not excluded
    pub fn include(&mut self, location: &Location) -> Result<bool> {
        if !self.state.data.excluded_files.iter().any(|e| e == location.as_str()) {
            return Ok(false);
        }
        self.transact(|state| {
            state.data.excluded_files.retain(|e| e != location.as_str());
            Ok(true)
        })
    }

    // === Indexing ===

    /// Index a document against the current state
    pub fn index(&self, location: &Location, content: &str) -> IndexedDocument {
        Indexer::new(&self.state).index(location, content)
    }

    /// Index a document, rendering each block through `sink`
    pub fn run(&self, location: &Location, content: &str, sink: &mut dyn RenderSink) -> IndexedDocument {
        Indexer::new(&self.state).run(location, content, sink)
    }

    /// Documents whose rendered references depend on `location`.
    ///
    /// Without a link index this reports the missing dependency once and
    /// returns nothing; numbering itself is unaffected.
    pub fn dependents(&self, location: &Location) -> Vec<Location> {
        match &self.link_index {
            Some(index) => index.backlinks(location),
            None => {
                if !self.missing_links_reported.replace(true) {
                    warn!("{}; cross-document references will not refresh", Error::MissingDependency(LINK_INDEX.to_string()));
                }
                Vec::new()
            }
        }
    }
}

impl<S: Store> Deref for CalloutEngine<S> {
    type Target = PluginState;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OPTION_KEYS;
    use crate::links::VaultLinkIndex;
    use crate::numeral::NumberStyle;
    use crate::store::MemoryStore;

    fn engine() -> CalloutEngine<MemoryStore> {
        CalloutEngine::load(MemoryStore::new()).unwrap()
    }

    #[test]
    fn test_set_option_persists() {
        let mut engine = engine();
        let algebra = Location::new("algebra");
        engine.set_option(&algebra, "numberStyle", "roman").unwrap();
        engine.set_option(&algebra, "titleSuffix", ":").unwrap();
        assert_eq!(engine.store().saves, 4);

        let reloaded = CalloutEngine::load(engine.store().clone()).unwrap();
        let resolved = reloaded.resolve(&Location::new("algebra/groups.md"));
        assert_eq!(resolved.number_style, NumberStyle::RomanLower);
        assert_eq!(resolved.title_suffix, ":");
    }

    #[test]
    fn test_set_option_rejects_bad_input() {
        let mut engine = engine();
        let before = engine.state().clone();
        let location = Location::new("a");

        assert!(matches!(
            engine.set_option(&location, "numberStile", "roman"),
            Err(Error::UnknownKey(_))
        ));
        assert!(matches!(
            engine.set_option(&location, "numberStyle", "greek"),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            engine.set_option(&location, "profile", "Klingon"),
            Err(Error::ProfileNotFound(_))
        ));
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.store().saves, 0);
    }

    #[test]
    fn test_unset_option() {
        let mut engine = engine();
        let location = Location::new("a");
        engine.set_option(&location, "numberInit", "3").unwrap();
        engine.unset_option(&location, "numberInit").unwrap();
        assert!(engine.settings(&location).is_none());

        let err = engine.unset_option(&Location::root(), "numberInit").unwrap_err();
        assert!(err.to_string().contains(ERROR_ROOT_UNSET));
        assert!(matches!(
            engine.unset_option(&location, "bogus"),
            Err(Error::UnknownKey(_))
        ));
    }

    #[test]
    fn test_every_key_settable() {
        let mut engine = engine();
        let location = Location::new("x");
        let values = [
            ("lang", "ja"),
            ("mathCalloutStyle", "vivid"),
            ("mathCalloutFontInherit", "true"),
            ("titleSuffix", ""),
            ("labelPrefix", "x:"),
            ("rename", r#"{"theorem":"Satz"}"#),
            ("numberPrefix", "1."),
            ("numberSuffix", ""),
            ("numberInit", "0"),
            ("numberStyle", "Alph"),
            ("numberDefault", ""),
            ("refFormat", "[type] [number]"),
            ("eqNumberPrefix", "1."),
            ("eqNumberSuffix", "'"),
            ("eqNumberInit", "2"),
            ("eqNumberStyle", "roman"),
            ("eqRefPrefix", "Eq. "),
            ("eqRefSuffix", ""),
            ("lineByLine", "false"),
            ("profile", "Japanese"),
        ];
        assert_eq!(values.len(), OPTION_KEYS.len());
        for (key, value) in values {
            engine.set_option(&location, key, value).unwrap();
        }
        let resolved = engine.resolve(&Location::new("x/y.md"));
        assert_eq!(resolved.profile, "Japanese");
        assert_eq!(resolved.number_init, 0);
        assert!(!resolved.line_by_line);
    }

    #[test]
    fn test_two_phase_delete_cancel_is_noop() {
        let mut engine = engine();
        engine.set_option(&Location::new("ja"), "profile", "Japanese").unwrap();
        let saves = engine.store().saves;
        let before = engine.state().clone();

        let plan = engine.plan_delete("Japanese").unwrap();
        assert!(plan.needs_replacement());
        drop(plan);

        assert_eq!(engine.state(), &before);
        assert_eq!(engine.store().saves, saves);
    }

    #[test]
    fn test_commit_delete_with_replacement() {
        let mut engine = engine();
        engine.set_option(&Location::new("ja"), "profile", "Japanese").unwrap();
        let plan = engine.plan_delete("Japanese").unwrap();
        let affected = engine.commit_delete(plan, Some("English")).unwrap();
        assert_eq!(affected, vec!["ja".to_string()]);
        assert!(engine.profile("Japanese").is_none());
        assert_eq!(engine.resolve(&Location::new("ja/a.md")).profile, "English");
    }

    #[test]
    fn test_delete_referenced_requires_replacement() {
        let mut engine = engine();
        engine.set_option(&Location::new("ja"), "profile", "Japanese").unwrap();
        assert!(matches!(
            engine.delete_profile("Japanese"),
            Err(Error::ReplacementRequired { .. })
        ));
        assert!(engine.profile("Japanese").is_some());
    }

    #[test]
    fn test_exclude_include() {
        let mut engine = engine();
        let drafts = Location::new("drafts");
        assert!(engine.exclude(&drafts).unwrap());
        assert!(!engine.exclude(&drafts).unwrap());
        assert!(engine.is_excluded(&Location::new("drafts/a.md")));

        let doc = engine.index(&Location::new("drafts/a.md"), "> [!math|{\"type\":\"lemma\"}]\n> x\n");
        assert!(doc.callouts.is_empty());

        assert!(engine.include(&drafts).unwrap());
        assert!(!engine.include(&drafts).unwrap());
        let doc = engine.index(&Location::new("drafts/a.md"), "> [!math|{\"type\":\"lemma\"}]\n> x\n");
        assert_eq!(doc.callouts[0].title, "Lemma 1.");
    }

    #[test]
    fn test_dependents() {
        let engine = engine();
        assert!(engine.dependents(&Location::new("a.md")).is_empty());
        assert!(engine.dependents(&Location::new("a.md")).is_empty());

        let links = VaultLinkIndex::build(vec![
            (Location::new("a.md"), ""),
            (Location::new("b.md"), "[[a#^thm-1]]"),
        ]);
        let engine = engine.with_link_index(links);
        assert_eq!(engine.dependents(&Location::new("a.md")), vec![Location::new("b.md")]);
    }
}
