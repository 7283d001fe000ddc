mod fences;
mod simulator;

pub use fences::{detect_closed_fences, PartialReply};
pub use simulator::{StreamSimulator, StreamState, StreamUpdate, DEFAULT_CHUNK_SIZE};
