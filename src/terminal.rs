use crossterm::{
    cursor::{RestorePosition, SavePosition, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use ratatui::{backend::CrosstermBackend, Terminal, TerminalOptions, Viewport};
use std::io::{self, Stdout};
use std::sync::Once;

pub type TerminalType = Terminal<CrosstermBackend<Stdout>>;
static PANIC_HOOK_INSTALLED: Once = Once::new();

pub fn install_panic_hook_once() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore();
            original_hook(panic_info);
        }));
    });
}

/// Raw mode plus an inline viewport of `height` rows below the cursor. The
/// shell's scrollback stays visible above it.
pub fn setup_inline(height: u16) -> io::Result<TerminalType> {
    install_panic_hook_once();

    enable_raw_mode()?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(height),
        },
    );
    if terminal.is_err() {
        let _ = restore();
    }
    terminal
}

pub fn restore() -> io::Result<()> {
    let _ = disable_raw_mode();
    execute!(io::stdout(), Show)
}

/// Remembers where the current round of output starts.
pub fn mark_region() -> io::Result<()> {
    execute!(io::stdout(), SavePosition)
}

/// Wipes everything printed since [`mark_region`].
pub fn clear_region() -> io::Result<()> {
    execute!(io::stdout(), RestorePosition, Clear(ClearType::FromCursorDown))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_hook_installs_once() {
        install_panic_hook_once();
        install_panic_hook_once();
        assert!(
            PANIC_HOOK_INSTALLED.is_completed(),
            "panic hook must be installed before raw mode setup"
        );
    }
}
