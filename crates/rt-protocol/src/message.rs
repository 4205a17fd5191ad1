//! Message types for the remote connection service
//!
//! These mirror `proto/putty_interface.proto` field for field, so they stay
//! wire compatible with the server without a `protoc` step.
//!
//! # Message Flow
//!
//! 1. Client sends `CreateRequest` carrying either `Serial` or `Ssh`
//!    parameters and receives a `ConnectionId`
//! 2. Client calls `Read(ConnectionId)` and receives a stream of `ByteChunk`
//! 3. Each keystroke goes out as a `WriteRequest`
//! 4. `Stop(ConnectionId)` tears the remote connection down, which also ends
//!    the read stream

use bytes::Bytes;

/// Serial port parameters
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Serial {
    /// Device path on the server, e.g. `/dev/ttyUSB0`
    #[prost(string, tag = "1")]
    pub port: String,
    /// Baud rate
    #[prost(uint32, tag = "2")]
    pub baud: u32,
}

/// SSH session parameters
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ssh {
    #[prost(string, tag = "1")]
    pub host: String,
    #[prost(uint32, tag = "2")]
    pub port: u32,
    #[prost(string, tag = "3")]
    pub user: String,
    #[prost(string, tag = "4")]
    pub password: String,
}

/// Request to open a new remote connection
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateRequest {
    #[prost(oneof = "create_request::Kind", tags = "1, 2")]
    pub kind: Option<create_request::Kind>,
}

/// Nested types for [`CreateRequest`]
pub mod create_request {
    /// Protocol-specific connection parameters
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Kind {
        #[prost(message, tag = "1")]
        Serial(super::Serial),
        #[prost(message, tag = "2")]
        Ssh(super::Ssh),
    }
}

impl CreateRequest {
    /// Build a request for a serial connection
    pub fn serial(port: impl Into<String>, baud: u32) -> Self {
        Self {
            kind: Some(create_request::Kind::Serial(Serial {
                port: port.into(),
                baud,
            })),
        }
    }

    /// Build a request for an SSH connection
    pub fn ssh(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            kind: Some(create_request::Kind::Ssh(Ssh {
                host: host.into(),
                port: u32::from(port),
                user: user.into(),
                password: password.into(),
            })),
        }
    }
}

/// Opaque identifier issued by the server for one open connection
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct ConnectionId {
    #[prost(string, tag = "1")]
    pub id: String,
}

impl ConnectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One chunk of bytes to write to a connection
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WriteRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(bytes = "bytes", tag = "2")]
    pub data: Bytes,
}

impl WriteRequest {
    pub fn new(id: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            data: data.into(),
        }
    }
}

/// One chunk of bytes read from a connection
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ByteChunk {
    #[prost(bytes = "bytes", tag = "1")]
    pub data: Bytes,
}

/// Empty acknowledgement
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Empty {}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_byte_chunk_wire_layout() {
        let chunk = ByteChunk {
            data: Bytes::from_static(b"ok"),
        };

        assert_eq!(chunk.encode_to_vec(), vec![0x0a, 0x02, b'o', b'k']);
    }

    #[test]
    fn test_write_request_wire_layout() {
        let request = WriteRequest::new("a", vec![b'h']);

        assert_eq!(
            request.encode_to_vec(),
            vec![0x0a, 0x01, b'a', 0x12, 0x01, b'h']
        );
    }

    #[test]
    fn test_create_request_serial_oneof() {
        let request = CreateRequest::serial("/dev/pts/3", 115200);
        let bytes = request.encode_to_vec();

        // Field 1, length-delimited: the Serial variant
        assert_eq!(bytes[0], 0x0a);

        let decoded = CreateRequest::decode(bytes.as_slice()).unwrap();
        match decoded.kind {
            Some(create_request::Kind::Serial(serial)) => {
                assert_eq!(serial.port, "/dev/pts/3");
                assert_eq!(serial.baud, 115200);
            }
            other => panic!("Expected serial kind, got {:?}", other),
        }
    }

    #[test]
    fn test_create_request_ssh_widens_port() {
        let request = CreateRequest::ssh("example.com", 2222, "root", "");

        match request.kind {
            Some(create_request::Kind::Ssh(ssh)) => {
                assert_eq!(ssh.port, 2222);
                assert_eq!(ssh.user, "root");
                assert!(ssh.password.is_empty());
            }
            other => panic!("Expected ssh kind, got {:?}", other),
        }
    }

    #[test]
    fn test_field_tags_match_proto() {
        let proto = include_str!("../proto/putty_interface.proto");

        for field in [
            "string port = 1;",
            "uint32 baud = 2;",
            "string host = 1;",
            "uint32 port = 2;",
            "string user = 3;",
            "string password = 4;",
            "Serial serial = 1;",
            "Ssh ssh = 2;",
            "string id = 1;",
            "bytes data = 2;",
            "bytes data = 1;",
        ] {
            assert!(proto.contains(field), "proto is missing `{}`", field);
        }

        for rpc in ["CreateRemoteConnection", "Read", "Write", "Stop"] {
            assert!(proto.contains(&format!("rpc {}(", rpc)));
        }
    }

    #[test]
    fn test_empty_encodes_to_nothing() {
        assert!(Empty {}.encode_to_vec().is_empty());
    }
}
