use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Progress animation shown while a completion request is outstanding. It
/// only draws; stopping it erases the current line.
pub struct Spinner {
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Must be called from within a tokio runtime.
    pub fn start() -> Self {
        let handle = tokio::spawn(async {
            let mut interval = tokio::time::interval(FRAME_INTERVAL);
            let mut frame = 0usize;
            loop {
                interval.tick().await;
                let glyph = SPINNER_FRAMES[frame % SPINNER_FRAMES.len()];
                let _ = execute!(
                    io::stdout(),
                    MoveToColumn(0),
                    SetForegroundColor(Color::Green),
                    Print(glyph),
                    ResetColor,
                    Print(' ')
                );
                frame = frame.wrapping_add(1);
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn disabled() -> Self {
        Self { handle: None }
    }

    pub async fn stop(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
            let _ = execute!(io::stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine));
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
