use super::input_metrics::truncate_with_ellipsis;
use super::theme::Theme;
use ratatui::{layout::Rect, text::Line, widgets::Paragraph, Frame};

/// Scroll position of the history pane, counted in rows from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryScroll {
    offset: usize,
    follow: bool,
}

impl Default for HistoryScroll {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl HistoryScroll {
    pub fn follow_tail(&mut self) {
        self.follow = true;
    }

    pub fn is_following(&self) -> bool {
        self.follow
    }

    pub fn scroll_up(&mut self, rows: usize, total: usize, viewport: usize) {
        let current = self.resolve(total, viewport);
        self.offset = current.saturating_sub(rows);
        self.follow = false;
    }

    pub fn scroll_down(&mut self, rows: usize, total: usize, viewport: usize) {
        let max = total.saturating_sub(viewport);
        self.offset = (self.resolve(total, viewport) + rows).min(max);
        self.follow = self.offset >= max;
    }

    /// First visible row for this frame.
    pub fn resolve(&self, total: usize, viewport: usize) -> usize {
        let max = total.saturating_sub(viewport);
        if self.follow {
            max
        } else {
            self.offset.min(max)
        }
    }
}

pub fn render_history(
    frame: &mut Frame<'_>,
    area: Rect,
    lines: Vec<Line<'static>>,
    scroll: &HistoryScroll,
    theme: &Theme,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let top = scroll.resolve(lines.len(), area.height as usize);
    let top = u16::try_from(top).unwrap_or(u16::MAX);
    frame.render_widget(
        Paragraph::new(lines).style(theme.base()).scroll((top, 0)),
        area,
    );
}

pub fn render_status_line(frame: &mut Frame<'_>, area: Rect, status: &str, theme: &Theme) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let text = truncate_with_ellipsis(status, area.width as usize);
    frame.render_widget(Paragraph::new(text).style(theme.dim()), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_scroll_follows_tail_until_user_scrolls() {
        let mut scroll = HistoryScroll::default();
        assert_eq!(scroll.resolve(50, 10), 40);
        assert_eq!(scroll.resolve(60, 10), 50);

        scroll.scroll_up(5, 60, 10);
        assert!(!scroll.is_following());
        assert_eq!(scroll.resolve(70, 10), 45);

        scroll.scroll_down(100, 70, 10);
        assert!(scroll.is_following());
        assert_eq!(scroll.resolve(80, 10), 70);
    }

    #[test]
    fn test_short_history_never_scrolls() {
        let mut scroll = HistoryScroll::default();
        scroll.scroll_up(3, 4, 10);
        assert_eq!(scroll.resolve(4, 10), 0);
    }

    #[test]
    fn test_history_shows_tail_rows() {
        let lines: Vec<Line<'static>> = (0..20).map(|i| Line::from(format!("row {i}"))).collect();
        let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
        terminal
            .draw(|frame| {
                render_history(
                    frame,
                    frame.area(),
                    lines.clone(),
                    &HistoryScroll::default(),
                    &Theme::new(false),
                )
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        let last: String = (0..20).map(|x| buffer[(x, 4)].symbol().to_string()).collect();
        assert_eq!(last.trim_end(), "row 19");
    }
}
