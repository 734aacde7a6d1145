//! Types a command into the controlling terminal's input queue.
//!
//! Local echo is switched off for the duration of the injection so the
//! characters only show up once, when the shell redraws its prompt. The echo
//! bracket is an [`EchoGuard`]: whatever happens between disabling echo and
//! the end of the call, the captured settings are written back.

#[cfg(any(target_os = "linux", target_os = "macos"))]
mod ioctl;

use std::io;
use thiserror::Error;

#[cfg(any(target_os = "linux", target_os = "macos"))]
pub use ioctl::TtyControl;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("command injection is not supported on {os}")]
    PlatformUnsupported { os: &'static str },

    #[error("stdin is not an interactive terminal")]
    NotATerminal,

    #[error("failed to read terminal settings: {0}")]
    ReadSettings(#[source] io::Error),

    #[error("failed to disable terminal echo: {0}")]
    DisableEcho(#[source] io::Error),

    /// The first character the terminal refused. A failed restore after it
    /// is kept as secondary detail.
    #[error("failed to inject character {ch:?}: {source}")]
    Char {
        ch: char,
        #[source]
        source: io::Error,
        restore_error: Option<io::Error>,
    },

    #[error("failed to restore terminal settings: {0}")]
    Restore(#[source] io::Error),
}

/// Line-discipline access plus simulated keyboard input.
pub trait TerminalControl {
    type Settings: Clone;

    fn get_settings(&mut self) -> io::Result<Self::Settings>;
    fn set_settings(&mut self, settings: &Self::Settings) -> io::Result<()>;
    fn without_echo(settings: &Self::Settings) -> Self::Settings;
    fn inject_char(&mut self, ch: char) -> io::Result<()>;
}

/// Holds the pre-injection settings and writes them back exactly once.
pub struct EchoGuard<'a, T: TerminalControl> {
    terminal: &'a mut T,
    snapshot: T::Settings,
    restored: bool,
}

impl<'a, T: TerminalControl> EchoGuard<'a, T> {
    pub fn disable(terminal: &'a mut T) -> Result<Self, InjectError> {
        let snapshot = terminal
            .get_settings()
            .map_err(InjectError::ReadSettings)?;
        let quiet = T::without_echo(&snapshot);
        if let Err(error) = terminal.set_settings(&quiet) {
            let _ = terminal.set_settings(&snapshot);
            return Err(InjectError::DisableEcho(error));
        }

        Ok(Self {
            terminal,
            snapshot,
            restored: false,
        })
    }

    pub fn terminal(&mut self) -> &mut T {
        self.terminal
    }

    pub fn restore(mut self) -> io::Result<()> {
        self.restored = true;
        self.terminal.set_settings(&self.snapshot)
    }
}

impl<T: TerminalControl> Drop for EchoGuard<'_, T> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.terminal.set_settings(&self.snapshot);
        }
    }
}

/// Injects `command` character by character through `terminal`.
pub fn inject_with<T: TerminalControl>(terminal: &mut T, command: &str) -> Result<(), InjectError> {
    tracing::debug!(chars = command.chars().count(), "injecting command");
    let mut guard = EchoGuard::disable(terminal)?;

    for ch in command.chars() {
        if let Err(source) = guard.terminal().inject_char(ch) {
            let restore_error = guard.restore().err();
            if let Some(error) = &restore_error {
                tracing::error!(%error, "terminal settings not restored after failed injection");
            }
            tracing::warn!(?ch, %source, "character injection failed");
            return Err(InjectError::Char {
                ch,
                source,
                restore_error,
            });
        }
    }

    guard.restore().map_err(InjectError::Restore)?;
    tracing::debug!("command injected");
    Ok(())
}

/// Injects into the terminal attached to stdin.
#[cfg(any(target_os = "linux", target_os = "macos"))]
pub fn inject(command: &str) -> Result<(), InjectError> {
    let mut terminal = TtyControl::stdin()?;
    inject_with(&mut terminal, command)
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
pub fn inject(_command: &str) -> Result<(), InjectError> {
    Err(InjectError::PlatformUnsupported {
        os: std::env::consts::OS,
    })
}
