//! Interactive relay session
//!
//! A session bridges the local terminal to one remote connection:
//!
//! - [`RawModeGuard`] scopes the raw-mode transition around the session
//! - [`SessionManager`] opens the connection and owns its identifier
//! - [`run_inbound`] drains the remote byte stream into local output on its
//!   own task
//! - [`KeystrokeDispatcher`] drains local input through the
//!   [`EscapeDetector`] and forwards bytes or stops the connection
//!
//! The two tasks share exactly one piece of state: a `CancellationToken`
//! that either side may trigger and neither ever resets.

mod dispatcher;
mod escape;
mod input;
mod manager;
mod reader;
mod relay;
mod terminal;

pub use dispatcher::{DispatchExit, KeystrokeDispatcher};
pub use escape::{EscapeDetector, EscapeState, KeyAction};
pub use input::{spawn_input_pump, spawn_stdin_pump};
pub use manager::{InboundStream, SessionManager};
pub use reader::{run_inbound, InboundEnd};
pub use relay::{RelaySession, SessionEnd, DISCONNECT_NOTICE};
pub use terminal::{CrosstermTerminal, RawModeGuard, TerminalMode};
