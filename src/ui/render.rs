use crate::types::{CommandEntry, CommandSet};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use std::ops::Range;
use unicode_width::UnicodeWidthStr;

/// Spaces between the longest command and its comment.
pub const MIN_COMMENT_GAP: usize = 2;

const TITLE: &str = "Choose a command:";
const SELECTED_BG: Color = Color::Rgb(100, 116, 139);
const HELP_FG: Color = Color::Rgb(161, 161, 170);
const KEY_FG: Color = Color::Rgb(244, 162, 97);

// (lead word, keys, action); keys render highlighted.
const HELP_LINES: [(&str, &[&str], &str); 4] = [
    ("Use", &["↑/↓", "k/j"], "to navigate"),
    ("Press", &["r"], "to rerun"),
    ("Press", &["Enter"], "to proceed"),
    ("Press", &["Ctrl+c", "q"], "to exit"),
];

// Blank and title above the list, two blanks and the help footer below.
const CHROME_ROWS: usize = 2 + 2 + HELP_LINES.len();

/// Rows of the selector: blank, title, one per entry, two blanks, help.
pub fn view_height(entries: &CommandSet) -> u16 {
    let rows = CHROME_ROWS + entries.len();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Index range of the rows that fit in `capacity` lines with `cursor` inside.
/// The window scrolls only as far as needed to keep the cursor on its last line.
pub fn visible_rows(len: usize, cursor: usize, capacity: usize) -> Range<usize> {
    let capacity = capacity.max(1);
    if len <= capacity {
        return 0..len;
    }
    let start = cursor.min(len - 1).saturating_sub(capacity - 1);
    start..start + capacity
}

/// One display label per entry, comments aligned to a shared column.
pub fn format_rows(entries: &CommandSet) -> Vec<String> {
    let widest = entries
        .iter()
        .map(|entry| entry.command.width())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|entry| format_row(entry, widest))
        .collect()
}

fn format_row(entry: &CommandEntry, widest: usize) -> String {
    if entry.comment.is_empty() {
        return entry.command.clone();
    }
    let padding = widest.saturating_sub(entry.command.width()) + MIN_COMMENT_GAP;
    format!("{}{}# {}", entry.command, " ".repeat(padding), entry.comment)
}

pub fn render_selector(frame: &mut Frame<'_>, area: Rect, rows: &[String], cursor: usize) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    // The viewport is clamped to the terminal, so a long list is windowed.
    let capacity = usize::from(area.height).saturating_sub(CHROME_ROWS);
    let window = visible_rows(rows.len(), cursor, capacity);

    let mut lines = Vec::with_capacity(window.len() + CHROME_ROWS);
    lines.push(Line::default());
    lines.push(Line::from(TITLE));
    for (index, row) in rows.iter().enumerate().take(window.end).skip(window.start) {
        if index == cursor {
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(
                    format!(" {row} "),
                    Style::default().fg(Color::White).bg(SELECTED_BG),
                ),
            ]));
        } else {
            lines.push(Line::from(format!("   {row} ")));
        }
    }
    lines.push(Line::default());
    lines.push(Line::default());
    lines.extend(HELP_LINES.iter().map(|(lead, keys, action)| help_line(lead, keys, action)));

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn help_line(lead: &str, keys: &[&str], action: &str) -> Line<'static> {
    let help = Style::default().fg(HELP_FG);
    let key = Style::default().fg(KEY_FG).add_modifier(Modifier::BOLD);

    let mut spans = vec![Span::styled(format!("  {lead} "), help)];
    for (index, name) in keys.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" or ", help));
        }
        spans.push(Span::styled(name.to_string(), key));
    }
    spans.push(Span::styled(format!(" {action}"), help));
    Line::from(spans)
}
