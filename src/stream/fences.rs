use crate::types::{CodeAttachment, CodeSnippet, PLACEHOLDER_TOKEN};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```([\w.+#-]*)[ \t]*\n(.*?)```").expect("Should compile: CODE_FENCE_RE")
});

const SUGGESTIONS_LABEL: &str = "code-suggestions";

/// Revealed reply text with its closed fences lifted out as attachments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialReply {
    pub text: String,
    pub attachments: Vec<CodeAttachment>,
}

/// Replace every closed code fence in `prefix` with the placeholder token and
/// return the fence bodies as snippets, in order. A fence still being streamed
/// into stays literal; `code-suggestions` fences are left for the message
/// renderer to parse.
pub fn detect_closed_fences(prefix: &str) -> PartialReply {
    let mut attachments = Vec::new();
    let text = CODE_FENCE_RE.replace_all(prefix, |caps: &Captures<'_>| {
        let label = caps.get(1).map_or("", |m| m.as_str());
        if label == SUGGESTIONS_LABEL {
            return caps[0].to_string();
        }
        let body = caps.get(2).map_or("", |m| m.as_str());
        let language = (!label.is_empty()).then_some(label);
        let code = body.strip_suffix('\n').unwrap_or(body);
        attachments.push(CodeAttachment::Snippet(CodeSnippet::new(code, language)));
        PLACEHOLDER_TOKEN.to_string()
    });

    PartialReply {
        text: text.into_owned(),
        attachments,
    }
}
