use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsoleLayout {
    pub header: Rect,
    pub history: Rect,
    pub status: Rect,
    pub input: Rect,
}

/// Header on top, scrolling history, a one-row status line, then the input.
pub fn split_console_layout(area: Rect, header_rows: u16, input_rows: u16) -> ConsoleLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_rows),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(input_rows.max(1)),
        ])
        .split(area);

    ConsoleLayout {
        header: chunks[0],
        history: chunks[1],
        status: chunks[2],
        input: chunks[3],
    }
}
