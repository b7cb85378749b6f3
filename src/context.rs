//! Command run context
//!
//! Locates the vault and opens the engine over its state directory.
//! The vault comes from, in priority order:
//! - the `--vault` argument
//! - the `MATH_CALLOUT_VAULT` environment variable
//! - the current directory

use std::path::{Path, PathBuf};

use crate::constants::ENV_VAULT;
use crate::engine::CalloutEngine;
use crate::error::Result;
use crate::links::VaultLinkIndex;
use crate::location::Location;
use crate::store::FileStore;
use crate::util;

/// Resolution context for command operations
#[derive(Debug, Clone)]
pub struct Context {
    /// Vault root directory
    pub vault: PathBuf,
    /// Whether to output in JSON format
    pub json: bool,
}

impl Context {
    pub fn new(vault: Option<&str>, json: bool) -> Self {
        Self {
            vault: vault_path(vault),
            json,
        }
    }

    /// Engine over `<vault>/.math-callout/`
    pub fn engine(&self) -> Result<CalloutEngine<FileStore>> {
        CalloutEngine::load(FileStore::for_vault(&self.vault))
    }

    /// Engine with a link index built from every document in the vault
    pub fn engine_with_links(&self) -> Result<CalloutEngine<FileStore>> {
        let links = VaultLinkIndex::from_vault(&self.vault)?;
        Ok(self.engine()?.with_link_index(links))
    }

    /// Location and filesystem path of a document argument
    pub fn document(&self, arg: &str) -> Result<(Location, PathBuf)> {
        Ok(util::resolve_document(&self.vault, arg)?)
    }

    pub fn vault(&self) -> &Path {
        &self.vault
    }
}

/// Vault directory by priority: explicit argument, environment, current dir.
/// Empty values count as unset.
pub fn vault_path(explicit: Option<&str>) -> PathBuf {
    choose_vault(explicit, std::env::var(ENV_VAULT).ok().as_deref())
}

fn choose_vault(explicit: Option<&str>, env: Option<&str>) -> PathBuf {
    explicit
        .filter(|p| !p.is_empty())
        .or_else(|| env.filter(|p| !p.is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
