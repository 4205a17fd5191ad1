//! Connection lifecycle for one relay session

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::{self, FusedStream, Stream, StreamExt};

use crate::error::{ConnectionError, RelayError};
use crate::traits::{ChunkStream, RemoteConnection};
use crate::types::{ConnectionDescriptor, ConnectionId};

/// Owns one open remote connection for the duration of a session
///
/// The connection identifier is fixed at `open` and shared read-only by the
/// inbound reader and the keystroke dispatcher.
pub struct SessionManager<C: RemoteConnection + ?Sized> {
    remote: Arc<C>,
    id: ConnectionId,
    descriptor: ConnectionDescriptor,
    stream_taken: AtomicBool,
}

impl<C: RemoteConnection + ?Sized> SessionManager<C> {
    /// Open a remote connection described by `descriptor`
    ///
    /// Any failure here is fatal for the session.
    pub async fn open(
        remote: Arc<C>,
        descriptor: ConnectionDescriptor,
    ) -> Result<Self, RelayError> {
        let id = remote
            .open(descriptor.params())
            .await
            .map_err(RelayError::ConnectionEstablishment)?;

        tracing::info!(connection_id = %id, "Opened {}", descriptor);

        Ok(Self {
            remote,
            id,
            descriptor,
            stream_taken: AtomicBool::new(false),
        })
    }

    pub fn connection_id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Forward one chunk of bytes to the remote connection
    ///
    /// Not retried: a failed write means the connection is broken.
    pub async fn write(&self, data: Bytes) -> Result<(), RelayError> {
        let len = data.len();
        self.remote.write(&self.id, data).await.map_err(|e| {
            tracing::error!(connection_id = %self.id, "Write failed: {}", e);
            RelayError::Write(e)
        })?;
        tracing::trace!(connection_id = %self.id, bytes = len, "Forwarded input");
        Ok(())
    }

    /// Ask the remote service to tear the connection down
    ///
    /// Best effort. The remote may already be closing the stream on its own,
    /// so failures are logged and otherwise ignored.
    pub async fn stop(&self) {
        match self.remote.stop(&self.id).await {
            Ok(()) => tracing::info!(connection_id = %self.id, "Stop requested"),
            Err(e) => tracing::warn!(connection_id = %self.id, "Stop failed: {}", e),
        }
    }

    /// Take the inbound byte stream of this connection
    ///
    /// May be called once per session. If the remote refuses the
    /// subscription the returned stream yields that error and ends, so the
    /// reader handles it like any other stream failure.
    pub async fn read_stream(&self) -> Result<InboundStream, RelayError> {
        if self.stream_taken.swap(true, Ordering::AcqRel) {
            return Err(RelayError::StreamAlreadyTaken(self.id.to_string()));
        }

        let inner = match self.remote.read_stream(&self.id).await {
            Ok(stream) => stream,
            Err(e) => stream::once(async move { Err::<Bytes, _>(e) }).boxed(),
        };

        Ok(InboundStream::new(inner))
    }
}

impl<C: RemoteConnection + ?Sized> std::fmt::Debug for SessionManager<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// Remote byte stream with a terminal exhausted state
///
/// Once it has returned `None` it keeps returning `None`; a finished session
/// cannot be resumed.
pub struct InboundStream {
    inner: stream::Fuse<ChunkStream>,
}

impl InboundStream {
    pub fn new(inner: ChunkStream) -> Self {
        Self {
            inner: inner.fuse(),
        }
    }

    /// Whether the stream has ended
    pub fn is_exhausted(&self) -> bool {
        self.inner.is_terminated()
    }
}

impl Stream for InboundStream {
    type Item = Result<Bytes, ConnectionError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl FusedStream for InboundStream {
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

impl std::fmt::Debug for InboundStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboundStream")
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}
