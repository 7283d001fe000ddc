use super::theme::Theme;
use crate::highlight::highlight_fragments;
use crate::types::CodeAttachment;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

const DEFAULT_LANGUAGE: &str = "javascript";

/// Everything needed to draw one code block.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlockProps {
    pub code: String,
    pub language: String,
    pub show_line_numbers: bool,
    /// 1-based rows drawn on the muted background.
    pub highlight: Vec<usize>,
    pub is_added: bool,
    pub is_removed: bool,
    pub file_name: Option<String>,
    /// First displayed line number. Display only.
    pub start_line: usize,
    pub description: Option<String>,
    pub apply_available: bool,
    pub copied: bool,
    pub focused: bool,
}

impl CodeBlockProps {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            show_line_numbers: true,
            highlight: Vec::new(),
            is_added: false,
            is_removed: false,
            file_name: None,
            start_line: 1,
            description: None,
            apply_available: false,
            copied: false,
            focused: false,
        }
    }

    pub fn from_attachment(attachment: &CodeAttachment) -> Self {
        match attachment {
            CodeAttachment::Snippet(snippet) => Self {
                language: snippet
                    .language
                    .clone()
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
                highlight: snippet.highlight.clone(),
                is_added: snippet.is_added,
                is_removed: snippet.is_removed,
                ..Self::new(snippet.code.clone())
            },
            CodeAttachment::Suggestion(edit) => Self {
                language: edit.language.clone(),
                highlight: edit.highlight.clone(),
                is_added: edit.is_added,
                is_removed: edit.is_removed,
                file_name: Some(edit.file.clone()).filter(|file| !file.is_empty()),
                start_line: edit.start_line,
                description: Some(edit.description.clone()).filter(|d| !d.is_empty()),
                apply_available: !edit.file.is_empty(),
                ..Self::new(edit.new_code.clone())
            },
        }
    }

    /// The block's rows: the whole code trimmed once, then split on `\n`.
    /// Inner blank lines and per-line indentation survive.
    pub fn lines(&self) -> Vec<&str> {
        self.code.trim().split('\n').collect()
    }

    fn row_style(&self, theme: &Theme, line_number: usize) -> Style {
        if self.is_removed {
            theme.removed()
        } else if self.is_added {
            theme.added()
        } else if self.highlight.contains(&line_number) {
            theme.emphasized_row()
        } else {
            Style::default()
        }
    }

    fn header(&self, theme: &Theme) -> Line<'static> {
        let mut spans = vec![Span::styled(
            if self.focused { "▌" } else { " " },
            theme.focused(),
        )];
        spans.push(Span::styled(format!("{} ", self.language), theme.dim()));
        if self.is_removed {
            spans.push(Span::styled("removed ", theme.removed_badge()));
        }
        if self.is_added {
            spans.push(Span::styled("added ", theme.added_badge()));
        }
        if let Some(file) = &self.file_name {
            spans.push(Span::styled(format!("{file} "), theme.title()));
        }
        if let Some(description) = &self.description {
            spans.push(Span::styled(format!("· {description} "), theme.dim()));
        }
        spans.push(Span::styled(
            if self.copied { " ✓ copied" } else { " ⧉ copy" },
            if self.copied {
                theme.added_badge()
            } else {
                theme.dim()
            },
        ));
        if self.apply_available {
            spans.push(Span::styled("  ↳ apply", theme.dim()));
        }
        Line::from(spans).style(theme.chrome())
    }

    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        let lines = self.lines();
        let last_number = self.start_line + lines.len().saturating_sub(1);
        let gutter_width = last_number.to_string().len().max(2);
        let marker = if self.is_removed {
            "-"
        } else if self.is_added {
            "+"
        } else {
            " "
        };

        let mut out = Vec::with_capacity(lines.len() + 1);
        out.push(self.header(theme));

        for (row, text) in lines.iter().enumerate() {
            let mut spans = Vec::new();
            if self.show_line_numbers {
                spans.push(Span::styled(
                    format!("{:>gutter_width$} ", self.start_line + row),
                    theme.gutter(),
                ));
            }
            spans.push(Span::raw(marker));
            spans.push(Span::raw(" "));
            for fragment in highlight_fragments(text, &self.language) {
                spans.push(Span::styled(fragment.text, theme.token(fragment.kind)));
            }
            // Emphasis follows the 1-based row within the block, not the displayed number.
            out.push(Line::from(spans).style(self.row_style(theme, row + 1)));
        }
        out
    }
}
