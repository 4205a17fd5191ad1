//! rt-protocol: Wire bindings for the remote connection service
//!
//! The remote service owns the serial port or SSH session and exposes it as
//! the `putty_interface.RemoteConnection` gRPC service. This crate carries
//! the protobuf messages and a client stub for its four calls:
//! create, read (server streaming), write and stop.

pub mod client;
pub mod error;
pub mod message;

pub use client::{RemoteConnectionClient, DEFAULT_TARGET, SERVICE_NAME};
pub use error::ProtocolError;
pub use message::{
    create_request, ByteChunk, ConnectionId, CreateRequest, Empty, Serial, Ssh, WriteRequest,
};
