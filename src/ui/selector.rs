use crate::terminal;
use crate::types::CommandSet;
use crate::ui::render::{format_rows, render_selector, view_height};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    Selected(String),
    Quit,
    Rerun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAction {
    Quit,
    Up,
    Down,
    Rerun,
    Select,
    Ignore,
}

impl SelectorAction {
    pub fn from_key(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return Self::Ignore;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Self::Quit,
                _ => Self::Ignore,
            };
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            return Self::Ignore;
        }

        match key.code {
            KeyCode::Char('q') => Self::Quit,
            KeyCode::Up | KeyCode::Char('k') => Self::Up,
            KeyCode::Down | KeyCode::Char('j') => Self::Down,
            KeyCode::Char('r') => Self::Rerun,
            KeyCode::Enter | KeyCode::Char(' ') => Self::Select,
            _ => Self::Ignore,
        }
    }
}

/// Cursor over a command set. The cursor wraps at both ends.
pub struct CommandSelector<'a> {
    entries: &'a CommandSet,
    rows: Vec<String>,
    cursor: usize,
}

impl<'a> CommandSelector<'a> {
    pub fn new(entries: &'a CommandSet) -> Self {
        Self {
            entries,
            rows: format_rows(entries),
            cursor: 0,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn apply(&mut self, action: SelectorAction) -> Option<SelectorOutcome> {
        let len = self.entries.len();
        match action {
            SelectorAction::Quit => Some(SelectorOutcome::Quit),
            SelectorAction::Rerun => Some(SelectorOutcome::Rerun),
            SelectorAction::Up if len > 0 => {
                self.cursor = (self.cursor + len - 1) % len;
                None
            }
            SelectorAction::Down if len > 0 => {
                self.cursor = (self.cursor + 1) % len;
                None
            }
            SelectorAction::Select => self
                .entries
                .get(self.cursor)
                .map(|entry| SelectorOutcome::Selected(entry.command.clone())),
            SelectorAction::Up | SelectorAction::Down | SelectorAction::Ignore => None,
        }
    }

    /// Redraws after every event until an outcome is reached.
    pub fn drive<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut next_event: impl FnMut() -> io::Result<Event>,
    ) -> io::Result<SelectorOutcome> {
        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                render_selector(frame, area, &self.rows, self.cursor);
            })?;

            if let Event::Key(key) = next_event()? {
                if let Some(outcome) = self.apply(SelectorAction::from_key(key)) {
                    tracing::debug!(?outcome, cursor = self.cursor, "selector finished");
                    return Ok(outcome);
                }
            }
        }
    }
}

/// Runs the selector inline on the real terminal and clears it afterwards.
pub fn select(entries: &CommandSet) -> io::Result<SelectorOutcome> {
    let mut terminal = terminal::setup_inline(view_height(entries))?;
    let mut selector = CommandSelector::new(entries);

    let outcome = selector.drive(&mut terminal, event::read);
    let cleared = terminal.clear();
    let restored = terminal::restore();

    let outcome = outcome?;
    cleared?;
    restored?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CommandEntry;
    use ratatui::backend::TestBackend;

    fn set_of(n: usize) -> CommandSet {
        CommandSet::new(
            (0..n)
                .map(|i| CommandEntry::new(format!("cmd-{i}"), ""))
                .collect(),
        )
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_bindings() {
        let cases = [
            (press(KeyCode::Char('q')), SelectorAction::Quit),
            (
                KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
                SelectorAction::Quit,
            ),
            (press(KeyCode::Up), SelectorAction::Up),
            (press(KeyCode::Char('k')), SelectorAction::Up),
            (press(KeyCode::Down), SelectorAction::Down),
            (press(KeyCode::Char('j')), SelectorAction::Down),
            (press(KeyCode::Char('r')), SelectorAction::Rerun),
            (press(KeyCode::Enter), SelectorAction::Select),
            (press(KeyCode::Char(' ')), SelectorAction::Select),
            (press(KeyCode::Char('x')), SelectorAction::Ignore),
            (press(KeyCode::Esc), SelectorAction::Ignore),
            (
                KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL),
                SelectorAction::Ignore,
            ),
        ];
        for (key, expected) in cases {
            assert_eq!(SelectorAction::from_key(key), expected, "{key:?}");
        }
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(SelectorAction::from_key(key), SelectorAction::Ignore);
    }

    #[test]
    fn test_down_moves_wrap_modulo_len() {
        for len in 1..=5 {
            let set = set_of(len);
            for n in 0..(3 * len + 2) {
                let mut selector = CommandSelector::new(&set);
                for _ in 0..n {
                    assert_eq!(selector.apply(SelectorAction::Down), None);
                }
                assert_eq!(selector.cursor(), n % len);
            }
        }
    }

    #[test]
    fn test_up_moves_wrap_backwards() {
        for len in 1..=5 {
            let set = set_of(len);
            for n in 0..(3 * len + 2) {
                let mut selector = CommandSelector::new(&set);
                for _ in 0..n {
                    selector.apply(SelectorAction::Up);
                }
                assert_eq!(selector.cursor(), (len - n % len) % len);
            }
        }
    }

    #[test]
    fn test_terminal_transitions() {
        let set = set_of(3);
        let mut selector = CommandSelector::new(&set);

        selector.apply(SelectorAction::Down);
        selector.apply(SelectorAction::Ignore);
        assert_eq!(selector.cursor(), 1);
        assert_eq!(
            selector.apply(SelectorAction::Select),
            Some(SelectorOutcome::Selected("cmd-1".to_string()))
        );
        assert_eq!(
            selector.apply(SelectorAction::Rerun),
            Some(SelectorOutcome::Rerun)
        );
        assert_eq!(
            selector.apply(SelectorAction::Quit),
            Some(SelectorOutcome::Quit)
        );
    }

    #[test]
    fn test_empty_set_only_quits_or_reruns() {
        let set = CommandSet::default();
        let mut selector = CommandSelector::new(&set);

        assert_eq!(selector.apply(SelectorAction::Down), None);
        assert_eq!(selector.apply(SelectorAction::Up), None);
        assert_eq!(selector.apply(SelectorAction::Select), None);
        assert_eq!(selector.cursor(), 0);
        assert_eq!(
            selector.apply(SelectorAction::Rerun),
            Some(SelectorOutcome::Rerun)
        );
    }

    #[test]
    fn test_drive_renders_until_outcome() {
        let set = CommandSet::new(vec![
            CommandEntry::new("ls -lt", "sorted by mtime"),
            CommandEntry::new("ls -ltr", "oldest first"),
        ]);
        let mut terminal =
            Terminal::new(TestBackend::new(60, view_height(&set))).expect("test terminal");
        let mut events = vec![
            Event::FocusGained,
            Event::Key(press(KeyCode::Char('x'))),
            Event::Key(press(KeyCode::Char('j'))),
            Event::Key(press(KeyCode::Enter)),
        ]
        .into_iter();

        let mut selector = CommandSelector::new(&set);
        let outcome = selector
            .drive(&mut terminal, || {
                events
                    .next()
                    .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
            })
            .expect("drive");

        assert_eq!(outcome, SelectorOutcome::Selected("ls -ltr".to_string()));
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(0, 3)].symbol(), ">");
    }

    #[test]
    fn test_drive_surfaces_input_errors() {
        let set = set_of(2);
        let mut terminal = Terminal::new(TestBackend::new(40, view_height(&set))).expect("term");
        let mut selector = CommandSelector::new(&set);

        let err = selector
            .drive(&mut terminal, || Err(io::Error::from(io::ErrorKind::BrokenPipe)))
            .expect_err("event error propagates");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
