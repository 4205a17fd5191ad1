//! Core domain types

use rt_protocol::CreateRequest;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier issued by the remote service for one open connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a new connection ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConnectionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConnectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Kind of remote connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    Serial,
    Ssh,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolKind::Serial => write!(f, "serial"),
            ProtocolKind::Ssh => write!(f, "ssh"),
        }
    }
}

/// Default serial device
pub const DEFAULT_SERIAL_PORT: &str = "/dev/pts/3";

/// Default serial baud rate
pub const DEFAULT_BAUD: u32 = 115200;

/// Default SSH port
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Protocol-specific parameters of a remote connection
///
/// Serialized with a `kind` tag so profiles read naturally in TOML:
///
/// ```toml
/// [profiles.bench]
/// kind = "serial"
/// port = "/dev/ttyUSB0"
/// baud = 115200
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConnectionParams {
    Serial {
        port: String,
        baud: u32,
    },
    Ssh {
        host: String,
        #[serde(default = "default_ssh_port")]
        port: u16,
        user: String,
        #[serde(default)]
        password: String,
    },
}

fn default_ssh_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl ConnectionParams {
    /// Serial parameters
    pub fn serial(port: impl Into<String>, baud: u32) -> Self {
        ConnectionParams::Serial {
            port: port.into(),
            baud,
        }
    }

    /// SSH parameters
    pub fn ssh(
        host: impl Into<String>,
        port: u16,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConnectionParams::Ssh {
            host: host.into(),
            port,
            user: user.into(),
            password: password.into(),
        }
    }

    /// Which protocol these parameters are for
    pub fn kind(&self) -> ProtocolKind {
        match self {
            ConnectionParams::Serial { .. } => ProtocolKind::Serial,
            ConnectionParams::Ssh { .. } => ProtocolKind::Ssh,
        }
    }
}

// Hand-written so the SSH credential never reaches logs
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionParams::Serial { port, baud } => f
                .debug_struct("Serial")
                .field("port", port)
                .field("baud", baud)
                .finish(),
            ConnectionParams::Ssh {
                host, port, user, ..
            } => f
                .debug_struct("Ssh")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionParams::Serial { port, baud } => write!(f, "serial {} @ {}", port, baud),
            ConnectionParams::Ssh {
                host, port, user, ..
            } => write!(f, "ssh {}@{}:{}", user, host, port),
        }
    }
}

impl From<&ConnectionParams> for CreateRequest {
    fn from(params: &ConnectionParams) -> Self {
        match params {
            ConnectionParams::Serial { port, baud } => CreateRequest::serial(port.clone(), *baud),
            ConnectionParams::Ssh {
                host,
                port,
                user,
                password,
            } => CreateRequest::ssh(host.clone(), *port, user.clone(), password.clone()),
        }
    }
}

/// Everything needed to open one remote connection
///
/// Built once from startup parameters and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    params: ConnectionParams,
}

impl ConnectionDescriptor {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    pub fn kind(&self) -> ProtocolKind {
        self.params.kind()
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }
}

impl From<ConnectionParams> for ConnectionDescriptor {
    fn from(params: ConnectionParams) -> Self {
        Self::new(params)
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.params, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rt_protocol::create_request::Kind;

    #[test]
    fn test_ssh_debug_redacts_password() {
        let params = ConnectionParams::ssh("example.com", 22, "root", "hunter2");
        let debug = format!("{:?}", params);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert_eq!(params.to_string(), "ssh root@example.com:22");
    }

    #[test]
    fn test_descriptor_kind() {
        let descriptor = ConnectionDescriptor::from(ConnectionParams::serial("/dev/pts/3", 115200));

        assert_eq!(descriptor.kind(), ProtocolKind::Serial);
        assert_eq!(descriptor.to_string(), "serial /dev/pts/3 @ 115200");
    }

    #[test]
    fn test_params_to_create_request() {
        let params = ConnectionParams::ssh("10.0.0.5", 2222, "pi", "raspberry");
        let request = CreateRequest::from(&params);

        match request.kind {
            Some(Kind::Ssh(ssh)) => {
                assert_eq!(ssh.host, "10.0.0.5");
                assert_eq!(ssh.port, 2222);
                assert_eq!(ssh.user, "pi");
                assert_eq!(ssh.password, "raspberry");
            }
            other => panic!("Expected ssh request, got {:?}", other),
        }
    }

    #[test]
    fn test_params_toml_shape() {
        let params: ConnectionParams = toml::from_str(
            r#"
            kind = "ssh"
            host = "router"
            user = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(params, ConnectionParams::ssh("router", 22, "admin", ""));
    }
}
