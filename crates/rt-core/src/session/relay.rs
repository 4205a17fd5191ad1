//! Relay session: wires the components together and owns shutdown

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::dispatcher::{DispatchExit, KeystrokeDispatcher};
use super::escape::EscapeDetector;
use super::manager::SessionManager;
use super::reader::{run_inbound, InboundEnd};
use super::terminal::{RawModeGuard, TerminalMode};
use crate::config::SessionConfig;
use crate::error::RelayError;
use crate::traits::RemoteConnection;
use crate::types::{ConnectionDescriptor, ConnectionId};

/// Printed once the session is over and the terminal is back to normal
pub const DISCONNECT_NOTICE: &str = "[disconnected]";

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed the escape sequence
    UserQuit,
    /// Local input reached end-of-input
    InputClosed,
    /// The remote service closed the stream
    RemoteClosed,
    /// The remote stream failed mid-session
    StreamFailed(String),
    /// Terminated by an outside request such as a signal
    Interrupted,
}

/// One interactive session against one remote connection
pub struct RelaySession<C: RemoteConnection + ?Sized> {
    manager: SessionManager<C>,
    config: SessionConfig,
    terminated: CancellationToken,
}

impl<C: RemoteConnection + ?Sized> RelaySession<C> {
    /// Open the remote connection for a new session
    pub async fn open(
        remote: Arc<C>,
        descriptor: ConnectionDescriptor,
        config: SessionConfig,
    ) -> Result<Self, RelayError> {
        config.validate()?;
        let manager = SessionManager::open(remote, descriptor).await?;

        Ok(Self {
            manager,
            config,
            terminated: CancellationToken::new(),
        })
    }

    pub fn connection_id(&self) -> &ConnectionId {
        self.manager.connection_id()
    }

    /// Token that ends the session when cancelled (e.g. from a signal handler)
    pub fn termination_token(&self) -> CancellationToken {
        self.terminated.clone()
    }

    /// Relay until the session ends, then shut down
    ///
    /// Shutdown always runs, whichever side ended the session: signal
    /// termination, wait for the inbound reader (bounded by
    /// `reader_join_timeout`), restore the terminal. A write failure is
    /// returned as an error after shutdown; a terminal restore failure is
    /// returned as an error only if nothing else went wrong.
    pub async fn run<T, W>(
        self,
        terminal: T,
        mut input: mpsc::Receiver<u8>,
        output: W,
    ) -> Result<SessionEnd, RelayError>
    where
        T: TerminalMode,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let detector = EscapeDetector::from_config(&self.config)?;
        let stream = self.manager.read_stream().await?;
        let guard = match RawModeGuard::acquire(terminal) {
            Ok(guard) => guard,
            Err(e) => {
                self.manager.stop().await;
                return Err(RelayError::Terminal(e));
            }
        };

        let reader = tokio::spawn(run_inbound(stream, output, self.terminated.clone()));

        let mut dispatcher =
            KeystrokeDispatcher::new(&self.manager, detector, self.terminated.clone());
        let dispatched = dispatcher.run(&mut input).await;

        self.terminated.cancel();
        let inbound = join_reader(reader, self.config.reader_join_timeout).await;
        let restored = guard.release();

        let end = match dispatched {
            Ok(exit) => session_end(exit, inbound),
            Err(e) => {
                if let Err(restore_err) = restored {
                    tracing::error!("Failed to restore terminal mode: {}", restore_err);
                }
                return Err(e);
            }
        };
        restored?;

        tracing::info!(connection_id = %self.manager.connection_id(), "Session ended: {:?}", end);
        Ok(end)
    }
}

impl<C: RemoteConnection + ?Sized> std::fmt::Debug for RelaySession<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("manager", &self.manager)
            .field("config", &self.config)
            .finish()
    }
}

fn session_end(exit: DispatchExit, inbound: Option<InboundEnd>) -> SessionEnd {
    match (exit, inbound) {
        (DispatchExit::UserQuit, _) => SessionEnd::UserQuit,
        (DispatchExit::InputClosed, _) => SessionEnd::InputClosed,
        (DispatchExit::Terminated, Some(InboundEnd::Closed)) => SessionEnd::RemoteClosed,
        (DispatchExit::Terminated, Some(InboundEnd::Failed(reason))) => {
            SessionEnd::StreamFailed(reason)
        }
        (DispatchExit::Terminated, _) => SessionEnd::Interrupted,
    }
}

/// Wait for the inbound reader, but never longer than `limit`
///
/// A reader stuck in a read that never returns is aborted. Join failures
/// are logged and otherwise ignored.
async fn join_reader(mut handle: JoinHandle<InboundEnd>, limit: Duration) -> Option<InboundEnd> {
    match tokio::time::timeout(limit, &mut handle).await {
        Ok(Ok(end)) => Some(end),
        Ok(Err(e)) => {
            tracing::debug!("Inbound reader task failed: {}", e);
            None
        }
        Err(_) => {
            tracing::debug!("Inbound reader still running after {:?}, aborting", limit);
            handle.abort();
            None
        }
    }
}
