mod console;
mod copy;
mod seed;

#[cfg(test)]
mod tests;

pub use console::{BlockKey, ConsoleState, Phase};
pub use copy::CopyIndicator;
pub use seed::demo_conversation;
