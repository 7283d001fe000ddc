mod layout;
mod suggestions;

pub use layout::{layout_message, MessageSegment};
pub use suggestions::{
    extract_code_suggestions, parse_suggestion_block, ExtractedSuggestions, RejectedBlock,
};
