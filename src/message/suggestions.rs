use crate::error::SuggestionError;
use crate::types::{CodeSuggestion, SuggestedEdit};
use regex::Regex;
use std::sync::LazyLock;

static SUGGESTIONS_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```code-suggestions\s+(.*?)```").expect("Should compile: SUGGESTIONS_FENCE_RE")
});

/// A `code-suggestions` fence whose body did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedBlock {
    /// Position of the fence among the message's suggestion fences.
    pub block: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSuggestions {
    /// Message text with every `code-suggestions` fence removed.
    pub text: String,
    pub suggestions: Vec<SuggestedEdit>,
    pub rejected: Vec<RejectedBlock>,
}

pub fn parse_suggestion_block(body: &str) -> Result<Vec<CodeSuggestion>, SuggestionError> {
    Ok(serde_json::from_str(body.trim())?)
}

/// Pull every `code-suggestions` fence out of `text`. A fence whose body does
/// not parse contributes nothing and is listed in `rejected`; the remaining
/// fences are still read. Pure; callers log `rejected` once per message.
pub fn extract_code_suggestions(text: &str) -> ExtractedSuggestions {
    let mut suggestions = Vec::new();
    let mut rejected = Vec::new();
    let mut found_any = false;

    for (block, captures) in SUGGESTIONS_FENCE_RE.captures_iter(text).enumerate() {
        found_any = true;
        let body = captures.get(1).map_or("", |m| m.as_str());
        match parse_suggestion_block(body) {
            Ok(parsed) => suggestions.extend(parsed.into_iter().map(SuggestedEdit::from)),
            Err(error) => rejected.push(RejectedBlock {
                block,
                reason: error.to_string(),
            }),
        }
    }

    if !found_any {
        return ExtractedSuggestions {
            text: text.to_string(),
            suggestions,
            rejected,
        };
    }

    ExtractedSuggestions {
        text: SUGGESTIONS_FENCE_RE.replace_all(text, "").into_owned(),
        suggestions,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_suggestions_and_strips_fence() {
        let text = "Try this:\n```code-suggestions\n[{\"file\":\"src/main.ts\",\"description\":\"fix path\",\"newCode\":\"const a = 1;\\nconst b = 2;\",\"highlight\":[2],\"isAdded\":true}]\n```\nDone.";
        let extracted = extract_code_suggestions(text);

        assert_eq!(extracted.text, "Try this:\n\nDone.");
        assert_eq!(extracted.suggestions.len(), 1);
        let edit = &extracted.suggestions[0];
        assert_eq!(edit.file, "src/main.ts");
        assert_eq!(edit.description, "fix path");
        assert_eq!(edit.new_code, "const a = 1;\nconst b = 2;");
        assert_eq!(edit.language, "typescript");
        assert_eq!(edit.highlight, vec![2]);
        assert_eq!(edit.end_line, 2);
        assert!(edit.is_added);
        assert!(!edit.is_removed);
    }

    #[test]
    fn test_invalid_block_is_skipped_without_aborting_others() {
        let text = "```code-suggestions\n{not json}\n```middle```code-suggestions\n[{\"file\":\"a.py\",\"description\":\"d\",\"newCode\":\"pass\"}]\n```";
        let extracted = extract_code_suggestions(text);

        assert_eq!(extracted.text, "middle");
        assert_eq!(extracted.suggestions.len(), 1);
        assert_eq!(extracted.suggestions[0].language, "python");
        assert_eq!(extracted.rejected.len(), 1);
        assert_eq!(extracted.rejected[0].block, 0);
        assert!(extracted.rejected[0].reason.contains("not a JSON array"));
    }

    #[test]
    fn test_non_array_payload_yields_error() {
        assert!(parse_suggestion_block("{\"file\":\"x\"}").is_err());
        assert!(parse_suggestion_block("[]").unwrap().is_empty());
    }

    #[test]
    fn test_text_without_fences_is_untouched() {
        let text = "plain ```code``` text";
        let extracted = extract_code_suggestions(text);
        assert_eq!(extracted.text, text);
        assert!(extracted.suggestions.is_empty());
    }

    #[test]
    fn test_parsed_fields_match_input_array() {
        let records = vec![
            CodeSuggestion {
                file: "one.ts".to_string(),
                description: "first".to_string(),
                new_code: "a()".to_string(),
                language: Some("ts".to_string()),
                highlight: Some(vec![1]),
                is_removed: Some(true),
                is_added: None,
            },
            CodeSuggestion {
                file: "two.py".to_string(),
                description: "second".to_string(),
                new_code: "b()\nc()".to_string(),
                language: None,
                highlight: None,
                is_removed: None,
                is_added: Some(true),
            },
        ];
        let body = serde_json::to_string(&records).unwrap();
        let parsed = parse_suggestion_block(&body).unwrap();
        assert_eq!(parsed, records);
    }
}
