//! Two-keystroke escape sequence detection

use crate::config::SessionConfig;
use crate::error::ConfigError;

/// Where the detector is in the escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeState {
    /// No escape key pending
    #[default]
    Idle,
    /// The escape key was the previous keystroke
    Armed,
}

/// What to do with one keystroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Send this byte to the remote connection
    Forward(u8),
    /// Consume the byte without sending anything
    Swallow,
    /// The user asked to end the session
    Quit,
}

/// Escape detector for the `<escape> <quit>` sequence (Ctrl+A x by default)
///
/// The escape keystroke is consumed speculatively. If the next keystroke is
/// not the quit key, only that next keystroke is forwarded; the escape byte
/// itself is dropped. Typing the escape key twice therefore sends one
/// literal escape byte.
#[derive(Debug, Clone)]
pub struct EscapeDetector {
    escape_key: u8,
    quit_key: u8,
    state: EscapeState,
}

impl EscapeDetector {
    pub const DEFAULT_ESCAPE_KEY: u8 = 0x01;
    pub const DEFAULT_QUIT_KEY: u8 = b'x';

    pub fn new(escape_key: u8, quit_key: u8) -> Self {
        Self {
            escape_key,
            quit_key,
            state: EscapeState::Idle,
        }
    }

    /// Build a detector from the session configuration
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let quit_key = config
            .quit_byte()
            .ok_or_else(|| ConfigError::Invalid("quit_key is not ASCII".into()))?;
        Ok(Self::new(config.escape_key, quit_key))
    }

    pub fn state(&self) -> EscapeState {
        self.state
    }

    /// Feed one keystroke and get the action for it
    pub fn feed(&mut self, byte: u8) -> KeyAction {
        match self.state {
            EscapeState::Idle if byte == self.escape_key => {
                self.state = EscapeState::Armed;
                KeyAction::Swallow
            }
            EscapeState::Idle => KeyAction::Forward(byte),
            EscapeState::Armed if byte == self.quit_key => {
                self.state = EscapeState::Idle;
                KeyAction::Quit
            }
            EscapeState::Armed => {
                self.state = EscapeState::Idle;
                KeyAction::Forward(byte)
            }
        }
    }

    /// Human-readable form of the sequence, e.g. `Ctrl+A x`
    pub fn describe(&self) -> String {
        format!("{} {}", key_name(self.escape_key), key_name(self.quit_key))
    }
}

impl Default for EscapeDetector {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ESCAPE_KEY, Self::DEFAULT_QUIT_KEY)
    }
}

fn key_name(byte: u8) -> String {
    match byte {
        0x00..=0x1f => format!("Ctrl+{}", char::from(b'@' + byte)),
        b if b.is_ascii_graphic() => char::from(b).to_string(),
        b => format!("0x{:02x}", b),
    }
}
