//! The store registry: a `stores.yaml` file mapping store names to root
//! directories.
//!
//! Access is two-phase by type: a [`Registry`] only knows where the file
//! lives and can `initialize()` or `load()` it; resolving a store name is
//! only possible on the [`LoadedRegistry`] that `load()` returns. There is
//! no "called get_store before load" failure mode to check for at runtime.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::path::validate_slug;
use crate::store::Store;

/// Registry file name.
pub const REGISTRY_FILE_NAME: &str = "stores.yaml";

/// One registered store: where it lives and, optionally, what it is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Absolute root directory of the store.
    pub path: PathBuf,
    /// Optional human-written description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Unloaded handle: knows the registry file location.
#[derive(Debug, Clone)]
pub struct Registry {
    file: PathBuf,
}

impl Registry {
    /// Use an explicit registry file path.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// The conventional per-user registry location
    /// (e.g. `~/.config/memtree/stores.yaml` on Linux).
    pub fn default_location() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "memtree")?;
        Some(Self::new(dirs.config_dir().join(REGISTRY_FILE_NAME)))
    }

    /// The registry file path.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Create an empty registry file if none exists. No-op otherwise.
    pub fn initialize(&self) -> Result<()> {
        if self.file.exists() {
            return Ok(());
        }

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let empty: BTreeMap<String, StoreConfig> = BTreeMap::new();
        let text = serde_yaml::to_string(&empty).map_err(|e| Error::Serialize {
            path: self.file.clone(),
            message: e.to_string(),
        })?;
        fs::write(&self.file, text).map_err(|e| Error::io(&self.file, e))?;

        info!(file = %self.file.display(), "initialized empty store registry");
        Ok(())
    }

    /// Parse the registry file. Missing file is [`Error::RegistryMissing`];
    /// malformed content is [`Error::RegistryParse`]. Entries that break the
    /// [`LoadedRegistry::insert`] rules (non-slug names, relative paths)
    /// surface the same errors `insert` returns.
    pub fn load(&self) -> Result<LoadedRegistry> {
        let text = match fs::read_to_string(&self.file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::RegistryMissing(self.file.clone()));
            }
            Err(e) => return Err(Error::io(&self.file, e)),
        };

        let stores = parse_registry(&text, &self.file)?;
        debug!(file = %self.file.display(), stores = stores.len(), "loaded registry");

        Ok(LoadedRegistry {
            file: self.file.clone(),
            stores,
        })
    }
}

/// Loaded handle: the parsed, cached name→store mapping.
///
/// The cache is only invalidated by [`LoadedRegistry::reload`]; mutations
/// are in-memory until [`LoadedRegistry::save`].
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    file: PathBuf,
    stores: BTreeMap<String, StoreConfig>,
}

impl LoadedRegistry {
    /// Resolve a store name to a storage handle scoped to its root.
    pub fn get_store(&self, name: &str) -> Result<Store> {
        let config = self
            .stores
            .get(name)
            .ok_or_else(|| Error::StoreNotFound(name.to_string()))?;
        Ok(Store::new(name, &config.path))
    }

    /// The registered store configurations, sorted by name.
    pub fn stores(&self) -> impl Iterator<Item = (&str, &StoreConfig)> {
        self.stores.iter().map(|(name, cfg)| (name.as_str(), cfg))
    }

    /// Look up a store's configuration.
    pub fn get(&self, name: &str) -> Option<&StoreConfig> {
        self.stores.get(name)
    }

    /// Register or replace a store. The name must be a valid slug and the
    /// path absolute.
    pub fn insert(&mut self, name: &str, config: StoreConfig) -> Result<()> {
        validate_slug(name)?;
        if !config.path.is_absolute() {
            return Err(Error::StorePathNotAbsolute {
                name: name.to_string(),
                path: config.path,
            });
        }
        self.stores.insert(name.to_string(), config);
        Ok(())
    }

    /// Unregister a store. Returns its configuration if it was present.
    /// The store's files on disk are untouched.
    pub fn remove(&mut self, name: &str) -> Option<StoreConfig> {
        self.stores.remove(name)
    }

    /// Serialize and overwrite the registry file.
    pub fn save(&self) -> Result<()> {
        let text = serde_yaml::to_string(&self.stores).map_err(|e| Error::Serialize {
            path: self.file.clone(),
            message: e.to_string(),
        })?;

        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::write(&self.file, text).map_err(|e| Error::io(&self.file, e))?;

        debug!(file = %self.file.display(), stores = self.stores.len(), "saved registry");
        Ok(())
    }

    /// Drop the cached mapping and re-read the file.
    pub fn reload(&mut self) -> Result<()> {
        let text = match fs::read_to_string(&self.file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::RegistryMissing(self.file.clone()));
            }
            Err(e) => return Err(Error::io(&self.file, e)),
        };
        self.stores = parse_registry(&text, &self.file)?;
        Ok(())
    }
}

fn parse_registry(text: &str, file: &Path) -> Result<BTreeMap<String, StoreConfig>> {
    // An empty file is an empty registry, not a parse failure.
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let stores: BTreeMap<String, StoreConfig> =
        serde_yaml::from_str(text).map_err(|e| Error::RegistryParse {
            path: file.to_path_buf(),
            message: e.to_string(),
        })?;

    // Hand-edited files obey the same rules as insert(): slug names and
    // absolute paths. A registry that breaks them never hands out a store.
    for (name, config) in &stores {
        validate_slug(name)?;
        if !config.path.is_absolute() {
            return Err(Error::StorePathNotAbsolute {
                name: name.clone(),
                path: config.path.clone(),
            });
        }
    }

    Ok(stores)
}
