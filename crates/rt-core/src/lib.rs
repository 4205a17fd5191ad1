//! rt-core: Relay session core for rterm
//!
//! This crate provides the domain types, the [`RemoteConnection`] seam to the
//! remote connection service, configuration and saved profiles, and the
//! interactive relay session that bridges the local terminal to a remote
//! serial port or SSH session.

pub mod config;
pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::{ConfigError, ConnectionError, RelayError};
pub use traits::{ChunkStream, RemoteConnection};
pub use types::{ConnectionDescriptor, ConnectionId, ConnectionParams, ProtocolKind};
