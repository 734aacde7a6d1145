use crate::terminal;
use crate::types::CommandSet;
use crate::ui::{selector, SelectorOutcome, Spinner};
use std::io;

/// Everything the orchestrator draws or reads on the user's terminal.
pub trait FrontendAdapter {
    /// Remembers where this round's output starts.
    fn begin_round(&mut self);
    fn show_progress(&mut self) -> Spinner;
    fn choose(&mut self, commands: &CommandSet) -> io::Result<SelectorOutcome>;
    /// Erases everything drawn since `begin_round`.
    fn discard_round(&mut self);
}

#[derive(Debug, Default)]
pub struct TerminalFrontend;

impl TerminalFrontend {
    pub fn new() -> Self {
        terminal::install_panic_hook_once();
        Self
    }
}

impl FrontendAdapter for TerminalFrontend {
    fn begin_round(&mut self) {
        if let Err(error) = terminal::mark_region() {
            tracing::warn!(%error, "failed to save cursor position");
        }
    }

    fn show_progress(&mut self) -> Spinner {
        Spinner::start()
    }

    fn choose(&mut self, commands: &CommandSet) -> io::Result<SelectorOutcome> {
        selector::select(commands)
    }

    fn discard_round(&mut self) {
        if let Err(error) = terminal::clear_region() {
            tracing::warn!(%error, "failed to clear previous suggestions");
        }
    }
}
