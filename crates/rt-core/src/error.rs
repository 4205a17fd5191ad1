//! Core error types for rterm

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a relay session
#[derive(Error, Debug)]
pub enum RelayError {
    /// The remote service refused or could not open the connection
    #[error("Failed to establish connection: {0}")]
    ConnectionEstablishment(#[source] ConnectionError),

    /// Forwarding a keystroke to the remote connection failed
    #[error("Failed to write to remote connection: {0}")]
    Write(#[source] ConnectionError),

    /// The read stream of a session was requested twice
    #[error("Read stream already taken for connection {0}")]
    StreamAlreadyTaken(String),

    /// Raw mode could not be entered or restored
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RelayError {
    /// Whether this error happened before any session existed
    pub fn is_establishment(&self) -> bool {
        matches!(self, RelayError::ConnectionEstablishment(_))
    }
}

/// Errors reported by a [`RemoteConnection`](crate::RemoteConnection)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The remote service could not be reached
    #[error("Remote service unreachable: {0}")]
    Unreachable(String),

    /// The remote service rejected the request parameters
    #[error("Rejected by remote service: {0}")]
    Rejected(String),

    /// The connection id is unknown to the remote service
    #[error("Connection not found: {0}")]
    NotFound(String),

    /// Transport failure mid-call
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote side already closed the connection
    #[error("Connection closed by remote")]
    Closed,
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No saved profile with that name
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),
}
