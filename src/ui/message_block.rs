use super::code_block::CodeBlockProps;
use super::input_metrics::wrap_input_lines;
use super::theme::Theme;
use crate::message::{layout_message, MessageSegment};
use crate::state::BlockKey;
use crate::types::{Message, MessageRole};
use ratatui::style::Style;
use ratatui::text::{Line, Span};

const INDENT: &str = "  ";

/// Per-block state owned by the console rather than by the message.
pub struct BlockDecor<'a> {
    pub focused: Option<BlockKey>,
    pub is_copied: &'a dyn Fn(BlockKey) -> bool,
    pub apply_wired: bool,
}

fn never_copied(_: BlockKey) -> bool {
    false
}

impl BlockDecor<'_> {
    pub fn plain() -> BlockDecor<'static> {
        BlockDecor {
            focused: None,
            is_copied: &never_copied,
            apply_wired: false,
        }
    }
}

/// Three pulsing dots followed by `label`; `frame` advances the pulse.
pub fn generating_indicator(theme: &Theme, frame: usize, label: &str) -> Line<'static> {
    let lit = frame % 3;
    let mut spans = vec![Span::raw(INDENT)];
    for dot in 0..3 {
        let style = if dot == lit {
            theme.title()
        } else {
            theme.dim()
        };
        spans.push(Span::styled("●", style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(format!(" {label}"), theme.dim()));
    Line::from(spans)
}

fn shows_indicator(message: &Message) -> bool {
    message.role == MessageRole::Loading
        || (message.streaming && message.display_text().is_empty())
}

/// Render one message as terminal rows, each already fitted to `width`
/// (prose is wrapped, code rows are clipped by the caller's viewport).
pub fn render_message(
    message: &Message,
    theme: &Theme,
    decor: &BlockDecor<'_>,
    width: usize,
    frame: usize,
) -> Vec<Line<'static>> {
    let surface = match message.role {
        MessageRole::User => theme.raised(),
        _ => Style::default(),
    };
    let mut out = vec![Line::default().style(surface)];

    if shows_indicator(message) {
        out.push(generating_indicator(theme, frame, "Generating"));
        out.push(Line::default());
        return out;
    }

    let text_width = width.saturating_sub(INDENT.len() * 2).max(1);
    for segment in layout_message(message.display_text(), &message.attachments) {
        match segment {
            MessageSegment::Paragraph(text) => {
                for row in wrap_input_lines(&text, text_width) {
                    out.push(Line::from(format!("{INDENT}{row}")).style(surface));
                }
            }
            MessageSegment::Code { index, attachment } => {
                let key = BlockKey {
                    message: message.id,
                    index,
                };
                let mut props = CodeBlockProps::from_attachment(&attachment);
                props.copied = (decor.is_copied)(key);
                props.focused = decor.focused == Some(key);
                props.apply_available &= decor.apply_wired;

                out.push(Line::default().style(surface));
                out.extend(props.render(theme));
                out.push(Line::default().style(surface));
            }
            MessageSegment::Gap => {}
        }
    }
    out.push(Line::default().style(surface));
    out
}
