//! Remote connection service trait

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::ConnectionError;
use crate::types::{ConnectionId, ConnectionParams};

/// Bytes produced by a remote connection, in delivery order
///
/// Ends when the remote service closes the stream. An `Err` item reports a
/// transport failure; consumers treat it as the end of the stream.
pub type ChunkStream = BoxStream<'static, Result<Bytes, ConnectionError>>;

/// Abstraction over the service that owns the serial port or SSH session
///
/// Implementations must tolerate `read_stream` and `write`/`stop` being in
/// flight at the same time from different tasks.
#[async_trait]
pub trait RemoteConnection: Send + Sync {
    /// Open a new remote connection and return its identifier
    async fn open(&self, params: &ConnectionParams) -> Result<ConnectionId, ConnectionError>;

    /// Subscribe to the bytes produced by a connection
    async fn read_stream(&self, id: &ConnectionId) -> Result<ChunkStream, ConnectionError>;

    /// Write one chunk of bytes to a connection
    async fn write(&self, id: &ConnectionId, data: Bytes) -> Result<(), ConnectionError>;

    /// Ask the remote service to tear a connection down
    async fn stop(&self, id: &ConnectionId) -> Result<(), ConnectionError>;
}
