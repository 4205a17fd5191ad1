//! gRPC backend for the remote connection service

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tonic::{Code, Status};

use rt_core::{ChunkStream, ConnectionError, ConnectionId, ConnectionParams, RemoteConnection};
use rt_protocol::{CreateRequest, ProtocolError, RemoteConnectionClient, WriteRequest};

/// [`RemoteConnection`] over the `putty_interface.RemoteConnection` service
///
/// Every call works on a clone of the client, so the read stream and the
/// unary calls share one HTTP/2 channel without locking.
#[derive(Debug, Clone)]
pub struct GrpcRemote {
    client: RemoteConnectionClient,
}

impl GrpcRemote {
    /// Connect to the service at `target`
    pub async fn connect(target: &str, timeout: Duration) -> Result<Self, ProtocolError> {
        let client = RemoteConnectionClient::connect(target, timeout).await?;
        Ok(Self { client })
    }

    pub fn from_client(client: RemoteConnectionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RemoteConnection for GrpcRemote {
    async fn open(&self, params: &ConnectionParams) -> Result<ConnectionId, ConnectionError> {
        let mut client = self.client.clone();
        let response = client
            .create_remote_connection(CreateRequest::from(params))
            .await
            .map_err(open_error)?;

        Ok(ConnectionId::new(response.into_inner().id))
    }

    async fn read_stream(&self, id: &ConnectionId) -> Result<ChunkStream, ConnectionError> {
        let mut client = self.client.clone();
        let streaming = client
            .read(rt_protocol::ConnectionId::new(id.as_str()))
            .await
            .map_err(status_to_error)?
            .into_inner();

        Ok(streaming
            .map(|item| item.map(|chunk| chunk.data).map_err(status_to_error))
            .boxed())
    }

    async fn write(&self, id: &ConnectionId, data: Bytes) -> Result<(), ConnectionError> {
        let mut client = self.client.clone();
        client
            .write(WriteRequest::new(id.as_str(), data))
            .await
            .map_err(status_to_error)?;
        Ok(())
    }

    async fn stop(&self, id: &ConnectionId) -> Result<(), ConnectionError> {
        let mut client = self.client.clone();
        client
            .stop(rt_protocol::ConnectionId::new(id.as_str()))
            .await
            .map_err(status_to_error)?;
        Ok(())
    }
}

/// The server reports a device or session it cannot open as `INTERNAL`
fn open_error(status: Status) -> ConnectionError {
    match status.code() {
        Code::Internal => ConnectionError::Rejected(status.message().to_string()),
        _ => status_to_error(status),
    }
}

/// Map a gRPC status onto the connection error taxonomy
pub fn status_to_error(status: Status) -> ConnectionError {
    let message = status.message().to_string();
    match status.code() {
        Code::NotFound => ConnectionError::NotFound(message),
        Code::Unavailable => ConnectionError::Unreachable(message),
        Code::InvalidArgument
        | Code::FailedPrecondition
        | Code::PermissionDenied
        | Code::Unauthenticated
        | Code::AlreadyExists => ConnectionError::Rejected(message),
        Code::Cancelled | Code::Aborted => ConnectionError::Closed,
        code => ConnectionError::Transport(format!("{:?}: {}", code, message)),
    }
}
