use serde::{Deserialize, Serialize};

/// Literal marker in message text where the next code attachment renders.
pub const PLACEHOLDER_TOKEN: &str = "```code```";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    System,
    /// Transient "Generating" entry, filtered out once a reply starts.
    Loading,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub role: MessageRole,
    pub attachments: Vec<CodeAttachment>,
    pub streaming: bool,
    pub partial: Option<String>,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self::with_role(id, MessageRole::User, content)
    }

    pub fn system(id: MessageId, content: impl Into<String>) -> Self {
        Self::with_role(id, MessageRole::System, content)
    }

    pub fn loading(id: MessageId) -> Self {
        Self::with_role(id, MessageRole::Loading, "Generating")
    }

    /// Empty reply slot that a stream simulation fills in.
    pub fn streaming_placeholder(id: MessageId) -> Self {
        Self {
            streaming: true,
            partial: Some(String::new()),
            ..Self::with_role(id, MessageRole::System, "")
        }
    }

    fn with_role(id: MessageId, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
            role,
            attachments: Vec::new(),
            streaming: false,
            partial: None,
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<CodeAttachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Text the renderer should show: the partial while streaming, else the content.
    pub fn display_text(&self) -> &str {
        if self.streaming {
            self.partial.as_deref().unwrap_or("")
        } else {
            &self.content
        }
    }
}

/// Code attached to a message. The variant is fixed at ingestion so renderers
/// never have to guess which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeAttachment {
    Snippet(CodeSnippet),
    Suggestion(SuggestedEdit),
}

impl CodeAttachment {
    pub fn code(&self) -> &str {
        match self {
            Self::Snippet(snippet) => &snippet.code,
            Self::Suggestion(edit) => &edit.new_code,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::Snippet(_) => None,
            Self::Suggestion(edit) => Some(edit.file.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub highlight: Vec<usize>,
    #[serde(default)]
    pub is_added: bool,
    #[serde(default)]
    pub is_removed: bool,
}

impl CodeSnippet {
    pub fn new(code: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            code: code.into(),
            language: language.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn added(mut self) -> Self {
        self.is_added = true;
        self
    }

    pub fn removed(mut self) -> Self {
        self.is_removed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedEdit {
    pub file: String,
    pub start_line: usize,
    pub end_line: usize,
    pub new_code: String,
    pub description: String,
    pub language: String,
    #[serde(default)]
    pub highlight: Vec<usize>,
    #[serde(default)]
    pub is_added: bool,
    #[serde(default)]
    pub is_removed: bool,
}

impl From<CodeSuggestion> for SuggestedEdit {
    fn from(suggestion: CodeSuggestion) -> Self {
        let language = suggestion
            .language
            .filter(|language| !language.trim().is_empty())
            .unwrap_or_else(|| language_for_file(&suggestion.file).to_string());
        Self {
            start_line: 1,
            end_line: suggestion.new_code.split('\n').count(),
            file: suggestion.file,
            new_code: suggestion.new_code,
            description: suggestion.description,
            language,
            highlight: suggestion.highlight.unwrap_or_default(),
            is_added: suggestion.is_added.unwrap_or(false),
            is_removed: suggestion.is_removed.unwrap_or(false),
        }
    }
}

/// One record of a `code-suggestions` JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSuggestion {
    pub file: String,
    pub description: String,
    pub new_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_removed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_added: Option<bool>,
}

fn language_for_file(file: &str) -> &'static str {
    if file.ends_with(".py") {
        "python"
    } else {
        "typescript"
    }
}
