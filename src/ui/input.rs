use super::editor::{EditAction, LineEditor};
use super::input_metrics::{cursor_row_col, display_width, truncate_with_ellipsis, wrap_input_lines};
use super::message_block::generating_indicator;
use super::theme::Theme;
use crate::types::{mock_context_files, ContextFileReference};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub const PLACEHOLDER: &str = "Plan, search, build anything";
const PROMPT: &str = "› ";
const PROMPT_WIDTH: usize = 2;
const MAX_EDITOR_ROWS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Submit(String),
    Stop,
    Accept,
    AddContext(ContextFileReference),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not an input key; the console may bind it.
    Ignored,
    Handled,
    Event(InputEvent),
}

#[derive(Debug)]
struct ContextPicker {
    selected: usize,
}

/// Prompt area: editor, context chips and picker, or the generating bar.
#[derive(Debug)]
pub struct ConsoleInput {
    editor: LineEditor,
    generating: bool,
    catalog: Vec<ContextFileReference>,
    context: Vec<ContextFileReference>,
    picker: Option<ContextPicker>,
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new(mock_context_files())
    }
}

impl ConsoleInput {
    pub fn new(catalog: Vec<ContextFileReference>) -> Self {
        Self {
            editor: LineEditor::default(),
            generating: false,
            catalog,
            context: Vec::new(),
            picker: None,
        }
    }

    pub fn buffer(&self) -> &str {
        self.editor.buffer()
    }

    pub fn context(&self) -> &[ContextFileReference] {
        &self.context
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn is_picker_open(&self) -> bool {
        self.picker.is_some()
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
        if generating {
            self.picker = None;
        }
    }

    pub fn paste(&mut self, text: &str) -> bool {
        if self.generating || self.picker.is_some() {
            return false;
        }
        self.editor.insert_str(text)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.generating {
            return match key.code {
                KeyCode::Esc => KeyOutcome::Event(InputEvent::Stop),
                KeyCode::Enter => KeyOutcome::Event(InputEvent::Accept),
                _ => KeyOutcome::Ignored,
            };
        }
        if self.picker.is_some() {
            return self.handle_picker_key(key);
        }

        match key.code {
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.catalog.is_empty() {
                    self.picker = Some(ContextPicker { selected: 0 });
                }
                return KeyOutcome::Handled;
            }
            KeyCode::Esc if !self.editor.is_empty() => {
                self.editor.clear();
                return KeyOutcome::Handled;
            }
            _ => {}
        }

        match self.editor.apply_key(key) {
            EditAction::Submit(text) => {
                if !self.context.is_empty() {
                    tracing::debug!(chips = self.context.len(), "context cleared on submit");
                }
                self.context.clear();
                KeyOutcome::Event(InputEvent::Submit(text))
            }
            EditAction::Changed => KeyOutcome::Handled,
            EditAction::Ignored => KeyOutcome::Ignored,
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(picker) = self.picker.as_mut() else {
            return KeyOutcome::Ignored;
        };
        let last = self.catalog.len().saturating_sub(1);
        match key.code {
            KeyCode::Up => picker.selected = picker.selected.saturating_sub(1),
            KeyCode::Down => picker.selected = (picker.selected + 1).min(last),
            KeyCode::Esc => self.picker = None,
            KeyCode::Enter => {
                let selected = picker.selected;
                self.picker = None;
                if let Some(reference) = self.catalog.get(selected).cloned() {
                    if !self.context.contains(&reference) {
                        self.context.push(reference.clone());
                    }
                    return KeyOutcome::Event(InputEvent::AddContext(reference));
                }
            }
            _ => {}
        }
        KeyOutcome::Handled
    }

    fn editor_rows(&self, width: u16) -> usize {
        let text_width = width.saturating_sub(PROMPT_WIDTH as u16).max(1) as usize;
        wrap_input_lines(self.editor.buffer(), text_width)
            .len()
            .clamp(1, MAX_EDITOR_ROWS)
    }

    /// Rows needed at `width`: border, context row, editor, footer.
    pub fn height(&self, width: u16) -> u16 {
        if self.generating {
            return 3;
        }
        (3 + self.editor_rows(width)) as u16
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme, pulse: usize) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(theme.dim())
            .style(theme.base());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.height == 0 {
            return;
        }

        let width = inner.width as usize;
        let mut lines = Vec::new();
        if self.generating {
            lines.push(self.generating_row(theme, pulse, width));
            lines.push(self.footer(theme, width));
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }

        lines.push(self.context_row(theme, width));
        let text_width = width.saturating_sub(PROMPT_WIDTH).max(1);
        let rows = wrap_input_lines(self.editor.buffer(), text_width);
        let (cursor_row, cursor_col) =
            cursor_row_col(self.editor.buffer(), self.editor.cursor(), text_width);
        let visible = self.editor_rows(inner.width);
        let window_start = (cursor_row + 1).saturating_sub(visible);

        if self.editor.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(PROMPT, theme.title()),
                Span::styled(PLACEHOLDER, theme.dim()),
            ]));
        } else {
            for (offset, row) in rows.iter().skip(window_start).take(visible).enumerate() {
                let prefix = if window_start + offset == 0 { PROMPT } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(prefix, theme.title()),
                    Span::raw(row.clone()),
                ]));
            }
        }
        while lines.len() < 1 + visible {
            lines.push(Line::default());
        }
        lines.push(self.footer(theme, width));
        frame.render_widget(Paragraph::new(lines), inner);

        let cursor_y = inner.y + 1 + cursor_row.saturating_sub(window_start) as u16;
        let cursor_x = (inner.x + (PROMPT_WIDTH + cursor_col) as u16)
            .min(inner.x + inner.width.saturating_sub(1));
        frame.set_cursor_position((cursor_x, cursor_y.min(inner.bottom().saturating_sub(1))));
    }

    fn context_row(&self, theme: &Theme, width: usize) -> Line<'static> {
        let mut spans = vec![Span::styled("@ Add context ", theme.dim())];
        for reference in &self.context {
            spans.push(Span::styled(
                format!(" {} ", reference.name),
                theme.raised().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        if display_width(&text) > width {
            return Line::styled(truncate_with_ellipsis(&text, width), theme.dim());
        }
        Line::from(spans)
    }

    fn generating_row(&self, theme: &Theme, pulse: usize, width: usize) -> Line<'static> {
        let mut line = generating_indicator(theme, pulse, "Generating...");
        let actions = "[ Stop esc ] [ Accept ⏎ ]";
        let used = line.width() + display_width(actions);
        line.spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
        line.spans.push(Span::styled(actions, theme.title()));
        line
    }

    fn footer(&self, theme: &Theme, width: usize) -> Line<'static> {
        let left = "Agent #1  Auto";
        let right = if self.generating {
            "esc stop · ⏎ accept"
        } else {
            "⏎ send · ⇧⏎ newline · tab code · ^y copy · ^p apply"
        };
        let room = width.saturating_sub(display_width(left) + 1);
        let right = truncate_with_ellipsis(right, room);
        let gap = width.saturating_sub(display_width(left) + display_width(&right));
        Line::from(vec![
            Span::styled(left, theme.dim()),
            Span::raw(" ".repeat(gap)),
            Span::styled(right, theme.dim()),
        ])
    }

    /// Context picker popup, anchored to sit just above `anchor`.
    pub fn render_picker(&self, frame: &mut Frame<'_>, anchor: Rect, theme: &Theme) {
        let Some(picker) = &self.picker else {
            return;
        };
        let screen = frame.area();
        let width = screen.width.clamp(20, 56);
        let height = (self.catalog.len() as u16 + 2).min(anchor.y.max(3));
        let area = Rect::new(
            anchor.x.min(screen.width.saturating_sub(width)),
            anchor.y.saturating_sub(height),
            width.min(screen.width),
            height,
        );
        frame.render_widget(Clear, area);

        let lines: Vec<Line<'static>> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(idx, reference)| {
                let label = truncate_with_ellipsis(&reference.label(), width.saturating_sub(4) as usize);
                if idx == picker.selected {
                    Line::styled(format!("› {label}"), theme.focused())
                } else {
                    Line::from(format!("  {label}"))
                }
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Add context")
                    .style(theme.raised()),
            ),
            area,
        );
    }
}
