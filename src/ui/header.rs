use super::input_metrics::{display_width, truncate_with_ellipsis};
use super::theme::Theme;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub const HEADER_ROWS: u16 = 2;

const DEMO_HINT: &str = "/demo ▶ Simplution";

/// Title bar (window dots, title, demo hint) above the terminal command strip.
pub fn header_lines(title: &str, command_line: &str, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let [red, yellow, green] = theme.window_dots();
    let dots_width = 7;
    let hint_width = display_width(DEMO_HINT) + 1;
    let title_room = width.saturating_sub(dots_width + hint_width).max(1);
    let title = truncate_with_ellipsis(title, title_room);
    let padding = width.saturating_sub(dots_width + display_width(&title) + hint_width);

    let title_row = Line::from(vec![
        Span::styled("●", red),
        Span::raw(" "),
        Span::styled("●", yellow),
        Span::raw(" "),
        Span::styled("●", green),
        Span::raw("  "),
        Span::styled(title, theme.title()),
        Span::raw(" ".repeat(padding)),
        Span::styled(format!("{DEMO_HINT} "), theme.dim()),
    ])
    .style(theme.base());

    let (program, args) = command_line
        .split_once(' ')
        .unwrap_or((command_line, ""));
    let command_row = Line::from(vec![
        Span::raw("  "),
        Span::styled(program.to_string(), theme.command()),
        Span::raw(" "),
        Span::raw(args.to_string()),
    ])
    .style(theme.raised());

    vec![title_row, command_row]
}

pub fn render_header(frame: &mut Frame<'_>, area: Rect, title: &str, command_line: &str, theme: &Theme) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let lines = header_lines(title, command_line, theme, area.width as usize);
    frame.render_widget(Paragraph::new(lines), area);
}
