use vexconsole::highlight::{highlight_fragments, highlight_line};
use vexconsole::message::{extract_code_suggestions, layout_message, MessageSegment};
use vexconsole::types::{CodeAttachment, CodeSnippet};

fn snippet(code: &str) -> CodeAttachment {
    CodeAttachment::Snippet(CodeSnippet::new(code, Some("ts")))
}

#[test]
fn test_placeholders_pair_positionally_with_gap_for_excess() {
    let two = layout_message("A```code```B```code```C", &[snippet("x"), snippet("y")]);
    assert_eq!(
        two,
        vec![
            MessageSegment::Paragraph("A".to_string()),
            MessageSegment::Code {
                index: 0,
                attachment: snippet("x")
            },
            MessageSegment::Paragraph("B".to_string()),
            MessageSegment::Code {
                index: 1,
                attachment: snippet("y")
            },
            MessageSegment::Paragraph("C".to_string()),
        ]
    );

    let one = layout_message("A```code```B```code```C", &[snippet("x")]);
    assert_eq!(one[3], MessageSegment::Gap);
    assert_eq!(one.len(), 5);
}

#[test]
fn test_suggestions_come_before_attachments() {
    let text = "```code-suggestions\n[{\"file\":\"a.py\",\"description\":\"d\",\"newCode\":\"pass\"}]\n```Intro```code```mid```code```";
    let segments = layout_message(text, &[snippet("attached")]);
    let codes: Vec<&CodeAttachment> = segments
        .iter()
        .filter_map(|segment| match segment {
            MessageSegment::Code { attachment, .. } => Some(attachment),
            _ => None,
        })
        .collect();
    assert_eq!(codes.len(), 2);
    assert!(matches!(codes[0], CodeAttachment::Suggestion(edit) if edit.language == "python"));
    assert_eq!(codes[1], &snippet("attached"));
}

#[test]
fn test_invalid_suggestion_json_is_dropped_quietly() {
    let extracted = extract_code_suggestions("before```code-suggestions\n{not json}\n```after");
    assert!(extracted.suggestions.is_empty());
    assert_eq!(extracted.text, "beforeafter");
}

#[test]
fn test_highlighter_is_pure_and_lossless() {
    let line = "const path = load('x.html', 42); // done";
    let first = highlight_line(line, "ts");
    assert_eq!(first, highlight_line(line, "ts"));

    let text: String = highlight_fragments(line, "ts")
        .into_iter()
        .map(|fragment| fragment.text)
        .collect();
    assert_eq!(text, line);
}
