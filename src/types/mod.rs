mod context;
mod message;

pub use context::{mock_context_files, ContextFileReference, ContextKind};
pub use message::{
    CodeAttachment, CodeSnippet, CodeSuggestion, Message, MessageId, MessageRole, SuggestedEdit,
    PLACEHOLDER_TOKEN,
};
