pub mod code_block;
pub mod editor;
pub mod header;
pub mod input;
pub mod input_metrics;
pub mod layout;
pub mod message_block;
pub mod render;
pub mod theme;

pub use code_block::CodeBlockProps;
pub use input::{ConsoleInput, InputEvent, KeyOutcome};
pub use message_block::{render_message, BlockDecor};
pub use theme::Theme;
