//! Client stub for the `putty_interface.RemoteConnection` service
//!
//! Hand-written equivalent of what `tonic-build` emits for the service in
//! `proto/putty_interface.proto`, so the workspace builds without a
//! protobuf compiler.

use std::time::Duration;

use http::uri::PathAndQuery;
use tonic::codec::{ProstCodec, Streaming};
use tonic::transport::{Channel, Endpoint};
use tonic::{IntoRequest, Response, Status};

use crate::error::ProtocolError;
use crate::message::{ByteChunk, ConnectionId, CreateRequest, Empty, WriteRequest};

/// Fully qualified gRPC service name
pub const SERVICE_NAME: &str = "putty_interface.RemoteConnection";

/// Address the reference server listens on
pub const DEFAULT_TARGET: &str = "http://127.0.0.1:50051";

const CREATE_PATH: &str = "/putty_interface.RemoteConnection/CreateRemoteConnection";
const READ_PATH: &str = "/putty_interface.RemoteConnection/Read";
const WRITE_PATH: &str = "/putty_interface.RemoteConnection/Write";
const STOP_PATH: &str = "/putty_interface.RemoteConnection/Stop";

/// gRPC client for the remote connection service
///
/// Cloning is cheap: clones share the underlying HTTP/2 channel, which lets
/// the inbound reader and the keystroke dispatcher issue calls concurrently.
#[derive(Debug, Clone)]
pub struct RemoteConnectionClient {
    inner: tonic::client::Grpc<Channel>,
}

impl RemoteConnectionClient {
    /// Connect to the service at `target`
    ///
    /// Accepts a full URI (`http://127.0.0.1:50051`) or a bare
    /// `host:port`, which is taken as plaintext `http`.
    pub async fn connect(target: &str, timeout: Duration) -> Result<Self, ProtocolError> {
        let endpoint = Endpoint::from_shared(endpoint_uri(target))
            .map_err(|e| ProtocolError::InvalidTarget {
                target: target.to_string(),
                reason: e.to_string(),
            })?
            .connect_timeout(timeout);

        tracing::debug!("Connecting to remote service at {}", target);

        let channel = endpoint
            .connect()
            .await
            .map_err(|source| ProtocolError::Unreachable {
                target: target.to_string(),
                source,
            })?;

        Ok(Self::new(channel))
    }

    /// Wrap an already established channel
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: tonic::client::Grpc::new(channel),
        }
    }

    async fn ready(&mut self) -> Result<(), Status> {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("Service was not ready: {}", e)))
    }

    /// Open a serial or SSH connection on the server
    pub async fn create_remote_connection(
        &mut self,
        request: impl IntoRequest<CreateRequest>,
    ) -> Result<Response<ConnectionId>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(CREATE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Subscribe to the bytes produced by a connection
    ///
    /// The stream ends when the server closes it, either because the
    /// connection was stopped or because the device/session went away.
    pub async fn read(
        &mut self,
        request: impl IntoRequest<ConnectionId>,
    ) -> Result<Response<Streaming<ByteChunk>>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(READ_PATH);
        self.inner
            .server_streaming(request.into_request(), path, codec)
            .await
    }

    /// Write one chunk of bytes to a connection
    pub async fn write(
        &mut self,
        request: impl IntoRequest<WriteRequest>,
    ) -> Result<Response<Empty>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(WRITE_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }

    /// Ask the server to tear a connection down
    pub async fn stop(
        &mut self,
        request: impl IntoRequest<ConnectionId>,
    ) -> Result<Response<Empty>, Status> {
        self.ready().await?;
        let codec = ProstCodec::default();
        let path = PathAndQuery::from_static(STOP_PATH);
        self.inner.unary(request.into_request(), path, codec).await
    }
}

/// Add the `http` scheme to a bare `host:port` target
fn endpoint_uri(target: &str) -> String {
    if target.contains("://") {
        target.to_string()
    } else {
        format!("http://{}", target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uri_adds_scheme_to_bare_address() {
        assert_eq!(endpoint_uri("127.0.0.1:50051"), "http://127.0.0.1:50051");
        assert_eq!(endpoint_uri("http://10.0.0.2:50051"), "http://10.0.0.2:50051");
        assert_eq!(endpoint_uri("https://relay.lan"), "https://relay.lan");
    }

    #[tokio::test]
    async fn test_connect_accepts_bare_host_port() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let target = listener.local_addr().unwrap().to_string();

        let result = RemoteConnectionClient::connect(&target, Duration::from_millis(500)).await;

        assert!(result.is_ok(), "bare {} should connect: {:?}", target, result.err());
    }

    #[test]
    fn test_method_paths_match_proto() {
        let proto = include_str!("../proto/putty_interface.proto");

        assert!(proto.contains("package putty_interface;"));
        assert!(proto.contains("service RemoteConnection {"));
        for path in [CREATE_PATH, READ_PATH, WRITE_PATH, STOP_PATH] {
            let method = path.rsplit('/').next().unwrap_or_default();
            assert!(proto.contains(&format!("rpc {}(", method)), "{}", path);
        }
    }

    #[test]
    fn test_method_paths_belong_to_service() {
        for path in [CREATE_PATH, READ_PATH, WRITE_PATH, STOP_PATH] {
            assert!(path.starts_with(&format!("/{}/", SERVICE_NAME)));
            PathAndQuery::from_static(path);
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_target() {
        let result = RemoteConnectionClient::connect("not a uri", Duration::from_millis(50)).await;

        assert!(matches!(
            result,
            Err(ProtocolError::InvalidTarget { .. })
        ));
    }
}
