//! Protocol error types

use thiserror::Error;

/// Errors that can occur while talking to the remote connection service
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The target could not be parsed as an endpoint URI
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The channel to the remote service could not be established
    #[error("Failed to reach remote service at {target}: {source}")]
    Unreachable {
        target: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// A call completed with a non-OK gRPC status
    #[error("Remote call failed: {0}")]
    Status(#[from] tonic::Status),
}

impl ProtocolError {
    /// The gRPC status carried by this error, if any
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            ProtocolError::Status(status) => Some(status),
            _ => None,
        }
    }
}
