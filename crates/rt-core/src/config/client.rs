//! Client configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use super::serde_utils::duration_millis;
use crate::error::ConfigError;
use crate::types::ConnectionParams;

/// Configuration for the rterm client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// URI of the remote connection service
    pub target: String,

    /// How long to wait for the service channel to come up
    #[serde(with = "duration_millis")]
    pub connect_timeout: Duration,

    /// Interactive session behavior
    pub session: SessionConfig,

    /// Saved connection profiles, keyed by name
    pub profiles: BTreeMap<String, ConnectionParams>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            target: rt_protocol::DEFAULT_TARGET.to_string(),
            connect_timeout: Duration::from_secs(5),
            session: SessionConfig::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::Invalid("target must not be empty".into()));
        }
        self.session.validate()
    }
}

/// Escape sequence and shutdown settings for a relay session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Byte that arms the escape sequence (Ctrl+A)
    pub escape_key: u8,

    /// Key that, typed right after the escape key, ends the session
    pub quit_key: char,

    /// Upper bound on waiting for the inbound reader at shutdown
    #[serde(with = "duration_millis")]
    pub reader_join_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            escape_key: 0x01,
            quit_key: 'x',
            reader_join_timeout: Duration::from_secs(1),
        }
    }
}

impl SessionConfig {
    /// The quit key as the raw byte read from the terminal
    pub fn quit_byte(&self) -> Option<u8> {
        u8::try_from(self.quit_key).ok().filter(u8::is_ascii)
    }

    /// Check that the escape sequence can actually be typed
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quit = self
            .quit_byte()
            .ok_or_else(|| ConfigError::Invalid(format!("quit_key {:?} is not ASCII", self.quit_key)))?;

        if quit == self.escape_key {
            return Err(ConfigError::Invalid(
                "escape_key and quit_key must differ".into(),
            ));
        }

        Ok(())
    }
}
