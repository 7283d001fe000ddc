pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod highlight;
pub mod logging;
pub mod message;
pub mod state;
pub mod stream;
pub mod terminal;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
