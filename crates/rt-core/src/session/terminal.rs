//! Terminal mode control

use std::io;

/// Switches the local terminal into raw mode and back
///
/// `enter_raw` must capture the current configuration before changing it;
/// `restore` must put back exactly that configuration.
pub trait TerminalMode: Send {
    /// Capture the current mode, then disable line buffering and echo
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Restore the mode captured by `enter_raw`
    fn restore(&mut self) -> io::Result<()>;
}

/// Raw mode through crossterm
///
/// crossterm snapshots the original termios on enable and restores that
/// snapshot on disable.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermTerminal;

impl TerminalMode for CrosstermTerminal {
    fn enter_raw(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }
}

/// Holds a terminal in raw mode for as long as it lives
///
/// The original mode is restored exactly once: by [`release`](Self::release)
/// when the caller wants to see the error, otherwise on drop (early return,
/// `?`, panic unwinding).
#[derive(Debug)]
pub struct RawModeGuard<T: TerminalMode> {
    terminal: T,
    active: bool,
}

impl<T: TerminalMode> RawModeGuard<T> {
    /// Enter raw mode
    pub fn acquire(mut terminal: T) -> io::Result<Self> {
        terminal.enter_raw()?;
        tracing::trace!("Entered raw mode");
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Restore the original mode now and report the outcome
    pub fn release(mut self) -> io::Result<()> {
        self.restore_once()
    }

    fn restore_once(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.terminal.restore()
    }
}

impl<T: TerminalMode> Drop for RawModeGuard<T> {
    fn drop(&mut self) {
        if let Err(e) = self.restore_once() {
            tracing::error!("Failed to restore terminal mode: {}", e);
        }
    }
}
