//! Profile registry
//!
//! Create, rename, copy and delete profiles. Renames and deletions
//! cascade to every location whose configuration names the profile.
//! Each operation validates first and only then mutates, so a failed
//! call leaves the state untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::constants::{COPY_PREFIX, ROOT_LOCATION};
use crate::error::{Error, Result};
use crate::kind::TheoremKind;
use crate::profile::{parse_tags, Profile};
use crate::state::PluginState;

static COPY_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ \((\d+)\)$").unwrap());

// === Registry ===

/// Mutable view over the profile table of a [`PluginState`]
pub struct Profiles<'a> {
    state: &'a mut PluginState,
}

impl PluginState {
    /// Profile registry operations
    pub fn profiles(&mut self) -> Profiles<'_> {
        Profiles { state: self }
    }

    /// Locations whose configuration names `id` as active profile, sorted
    pub fn profile_references(&self, id: &str) -> Vec<String> {
        self.data
            .settings
            .iter()
            .filter(|(_, config)| config.profile.as_deref() == Some(id))
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl<'a> Profiles<'a> {
    /// Add an empty profile
    pub fn add(self, id: &str) -> Result<&'a Profile> {
        if id.is_empty() {
            return Err(Error::EmptyProfileId);
        }
        if self.state.extra.profiles.contains_key(id) {
            return Err(Error::ProfileExists(id.to_string()));
        }

        info!(profile = id, "adding profile");
        let state = self.state;
        Ok(state
            .extra
            .profiles
            .entry(id.to_string())
            .or_insert_with(|| Profile::empty(id)))
    }

    /// Re-key a profile and rewrite every location referencing it.
    /// Returns the rewritten locations.
    pub fn rename(&mut self, old_id: &str, new_id: &str) -> Result<Vec<String>> {
        if new_id.is_empty() {
            return Err(Error::EmptyProfileId);
        }
        if !self.state.extra.profiles.contains_key(old_id) {
            return Err(Error::ProfileNotFound(old_id.to_string()));
        }
        if new_id == old_id {
            return Ok(Vec::new());
        }
        if self.state.extra.profiles.contains_key(new_id) {
            return Err(Error::ProfileExists(new_id.to_string()));
        }

        let affected = self.state.profile_references(old_id);
        let Some(mut profile) = self.state.extra.profiles.remove(old_id) else {
            return Err(Error::ProfileNotFound(old_id.to_string()));
        };
        profile.id = new_id.to_string();
        self.state.extra.profiles.insert(new_id.to_string(), profile);
        self.repoint(&affected, Some(new_id));

        info!(from = old_id, to = new_id, locations = affected.len(), "renamed profile");
        Ok(affected)
    }

    /// Deep-copy a profile under a fresh `Copy of <id>` name
    pub fn copy(&mut self, id: &str) -> Result<String> {
        let Some(source) = self.state.extra.profiles.get(id) else {
            return Err(Error::ProfileNotFound(id.to_string()));
        };

        let new_id = self.copy_name(id);
        let mut copy = source.clone();
        copy.id = new_id.clone();
        self.state.extra.profiles.insert(new_id.clone(), copy);

        info!(source = id, copy = %new_id, "copied profile");
        Ok(new_id)
    }

    /// Next free copy name: one past the largest existing copy suffix,
    /// where an unsuffixed copy counts as 1.
    fn copy_name(&self, id: &str) -> String {
        let base = format!("{}{}", COPY_PREFIX, id);
        let highest = self
            .state
            .extra
            .profiles
            .keys()
            .filter_map(|existing| {
                let rest = existing.strip_prefix(&base)?;
                if rest.is_empty() {
                    return Some(1);
                }
                COPY_SUFFIX.captures(rest)?[1].parse::<usize>().ok()
            })
            .max();

        let mut n = match highest {
            None => return base,
            Some(n) => n + 1,
        };
        // A user rename may already occupy the computed name.
        while self.state.extra.profiles.contains_key(&format!("{} ({})", base, n)) {
            n += 1;
        }
        format!("{} ({})", base, n)
    }

    /// Replace a profile's tags from comma-separated input
    pub fn set_tags(&mut self, id: &str, input: &str) -> Result<()> {
        let tags = parse_tags(input)?;
        let profile = self
            .state
            .extra
            .profiles
            .get_mut(id)
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))?;
        profile.meta.tags = tags;
        Ok(())
    }

    /// Change the display string of one kind
    pub fn set_display_name(&mut self, id: &str, kind: TheoremKind, name: &str) -> Result<()> {
        let profile = self
            .state
            .extra
            .profiles
            .get_mut(id)
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))?;
        profile.body[kind] = name.to_string();
        Ok(())
    }

    /// First phase of deletion: collect affected locations without
    /// touching anything. Dropping the plan cancels the deletion.
    pub fn plan_delete(&self, id: &str) -> Result<DeletePlan> {
        if !self.state.extra.profiles.contains_key(id) {
            return Err(Error::ProfileNotFound(id.to_string()));
        }
        if self.state.extra.profiles.len() == 1 {
            return Err(Error::LastProfile(id.to_string()));
        }
        Ok(DeletePlan {
            id: id.to_string(),
            affected: self.state.profile_references(id),
        })
    }

    /// Second phase: repoint affected locations to `replacement`
    /// (`None` unsets the reference) and remove the profile.
    pub fn commit_delete(&mut self, plan: DeletePlan, replacement: Option<&str>) -> Result<Vec<String>> {
        if let Some(replacement) = replacement {
            if replacement == plan.id || !self.state.extra.profiles.contains_key(replacement) {
                return Err(Error::ProfileNotFound(replacement.to_string()));
            }
        }
        // The state may have changed since the plan was made.
        let plan = self.plan_delete(&plan.id)?;

        self.state.extra.profiles.remove(&plan.id);
        self.repoint(&plan.affected, replacement);
        self.state.ensure_root_defaults();

        info!(profile = %plan.id, locations = plan.affected.len(), "deleted profile");
        Ok(plan.affected)
    }

    /// Delete a profile in one step. Fails with `ReplacementRequired`
    /// when locations still reference it.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let plan = self.plan_delete(id)?;
        if !plan.affected.is_empty() {
            return Err(Error::ReplacementRequired {
                id: plan.id,
                locations: plan.affected,
            });
        }
        self.commit_delete(plan, None).map(|_| ())
    }

    fn repoint(&mut self, locations: &[String], target: Option<&str>) {
        for path in locations {
            if let Some(config) = self.state.data.settings.get_mut(path) {
                debug!(location = %path, profile = ?target, "repointing profile reference");
                config.profile = target.map(str::to_string);
            }
        }
        // Unsetting at non-root locations may leave empty entries behind.
        self.state
            .data
            .settings
            .retain(|path, config| path == ROOT_LOCATION || !config.is_empty());
    }
}

/// Pending profile deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePlan {
    /// Profile to delete
    pub id: String,
    /// Locations currently referencing it
    pub affected: Vec<String>,
}

impl DeletePlan {
    pub fn needs_replacement(&self) -> bool {
        !self.affected.is_empty()
    }
}
