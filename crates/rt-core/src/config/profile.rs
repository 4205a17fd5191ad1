//! Saved connection profiles
//!
//! Profiles live in the `[profiles]` table of the client config file, so
//! the store is a thin layer that loads the file, edits the table and
//! writes the file back.

use std::path::{Path, PathBuf};

use super::{load_or_default, save_config, ClientConfig};
use crate::error::ConfigError;
use crate::types::ConnectionParams;

/// A user-named connection preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub params: ConnectionParams,
}

/// Read/write access to the profiles of one config file
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    config: ClientConfig,
}

impl ProfileStore {
    /// Open the store backed by `path` (which need not exist yet)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_or_default(&path)?;
        Ok(Self { path, config })
    }

    /// Path of the backing config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The full client configuration the profiles were loaded with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// All profiles, sorted by name
    pub fn list(&self) -> Vec<Profile> {
        self.config
            .profiles
            .iter()
            .map(|(name, params)| Profile {
                name: name.clone(),
                params: params.clone(),
            })
            .collect()
    }

    /// Look up a profile by name
    pub fn get(&self, name: &str) -> Result<&ConnectionParams, ConfigError> {
        self.config
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }

    /// Create or overwrite a profile and persist the file
    pub fn save(&mut self, name: &str, params: ConnectionParams) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("profile name must not be empty".into()));
        }

        self.config.profiles.insert(name.to_string(), params);
        save_config(&self.path, &self.config)?;
        tracing::debug!(profile = name, "Saved profile to {:?}", self.path);
        Ok(())
    }

    /// Delete a profile; `Ok(false)` if it did not exist
    pub fn delete(&mut self, name: &str) -> Result<bool, ConfigError> {
        if self.config.profiles.remove(name).is_none() {
            return Ok(false);
        }

        save_config(&self.path, &self.config)?;
        Ok(true)
    }
}
