//! Keystroke dispatcher: local input to the remote connection

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::escape::{EscapeDetector, KeyAction};
use super::manager::SessionManager;
use crate::error::RelayError;
use crate::traits::RemoteConnection;

/// Why the dispatch loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchExit {
    /// The user typed the escape sequence; `stop` was sent
    UserQuit,
    /// Local input reached end-of-input; no `stop` was sent
    InputClosed,
    /// The session was terminated elsewhere (remote close or signal)
    Terminated,
}

/// Runs the escape detector over local input and forwards the result
pub struct KeystrokeDispatcher<'a, C: RemoteConnection + ?Sized> {
    manager: &'a SessionManager<C>,
    detector: EscapeDetector,
    terminated: CancellationToken,
}

impl<'a, C: RemoteConnection + ?Sized> KeystrokeDispatcher<'a, C> {
    pub fn new(
        manager: &'a SessionManager<C>,
        detector: EscapeDetector,
        terminated: CancellationToken,
    ) -> Self {
        Self {
            manager,
            detector,
            terminated,
        }
    }

    /// Dispatch keystrokes until the session ends
    ///
    /// Bytes are forwarded one write per keystroke, in input order. A write
    /// failure ends the loop with [`RelayError::Write`].
    pub async fn run(&mut self, input: &mut mpsc::Receiver<u8>) -> Result<DispatchExit, RelayError> {
        loop {
            if self.terminated.is_cancelled() {
                return Ok(DispatchExit::Terminated);
            }

            let byte = tokio::select! {
                biased;
                _ = self.terminated.cancelled() => return Ok(DispatchExit::Terminated),
                byte = input.recv() => match byte {
                    Some(byte) => byte,
                    None => return Ok(DispatchExit::InputClosed),
                },
            };

            match self.detector.feed(byte) {
                KeyAction::Swallow => continue,
                KeyAction::Quit => {
                    self.manager.stop().await;
                    return Ok(DispatchExit::UserQuit);
                }
                KeyAction::Forward(byte) => {
                    self.manager.write(Bytes::copy_from_slice(&[byte])).await?;
                }
            }
        }
    }
}
