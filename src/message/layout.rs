use super::suggestions::extract_code_suggestions;
use crate::types::{CodeAttachment, PLACEHOLDER_TOKEN};

#[derive(Debug, Clone, PartialEq)]
pub enum MessageSegment {
    /// One line of prose. Blank lines inside a text part stay as empty paragraphs.
    Paragraph(String),
    /// A code block; `index` is its position in suggestions ++ attachments.
    Code {
        index: usize,
        attachment: CodeAttachment,
    },
    /// Placeholder with nothing left to pair it with.
    Gap,
}

/// Lay a message out as prose interleaved with code blocks.
///
/// Parsed `code-suggestions` come first, then the message's own attachments.
/// The Nth placeholder in the text takes the Nth entry of that combined list;
/// pairing is purely positional.
pub fn layout_message(text: &str, attachments: &[CodeAttachment]) -> Vec<MessageSegment> {
    let extracted = extract_code_suggestions(text);
    let suggestion_count = extracted.suggestions.len();
    let blocks: Vec<CodeAttachment> = extracted
        .suggestions
        .into_iter()
        .map(CodeAttachment::Suggestion)
        .chain(attachments.iter().cloned())
        .collect();

    let parts: Vec<&str> = extracted.text.split(PLACEHOLDER_TOKEN).collect();
    let mut segments = Vec::new();

    for (index, part) in parts.iter().enumerate() {
        if !part.is_empty() {
            segments.extend(
                part.split('\n')
                    .map(|line| MessageSegment::Paragraph(line.to_string())),
            );
        }
        if index + 1 < parts.len() {
            segments.push(match blocks.get(index) {
                Some(attachment) => MessageSegment::Code {
                    index,
                    attachment: attachment.clone(),
                },
                None => MessageSegment::Gap,
            });
        }
    }

    // Suggestions with no placeholder to land on still get shown after the text.
    if parts.len() <= 1 && suggestion_count > 0 {
        segments.extend(
            blocks
                .into_iter()
                .take(suggestion_count)
                .enumerate()
                .map(|(index, attachment)| MessageSegment::Code { index, attachment }),
        );
    }

    segments
}
