use super::fences::{detect_closed_fences, PartialReply};

pub const DEFAULT_CHUNK_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Streaming,
    Finalized,
    Aborted,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finalized | Self::Aborted)
    }
}

/// What one tick published.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamUpdate {
    /// Characters of the response revealed so far.
    pub revealed: usize,
    pub reply: PartialReply,
    /// The tick reached the end of the response and finalized the stream.
    pub finished: bool,
}

/// Reveals a canned response in fixed-size character chunks.
///
/// Each tick publishes the whole prefix up to the new cursor, never a delta,
/// so observers always see a growing prefix of the final text.
#[derive(Debug, Clone)]
pub struct StreamSimulator {
    response: String,
    // Byte offset of every char boundary, including the end of the string.
    boundaries: Vec<usize>,
    chunk_size: usize,
    cursor: usize,
    state: StreamState,
}

impl StreamSimulator {
    pub fn new(response: impl Into<String>, chunk_size: usize) -> Self {
        let response = response.into();
        let boundaries = response
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(response.len()))
            .collect();
        Self {
            response,
            boundaries,
            chunk_size: chunk_size.max(1),
            cursor: 0,
            state: StreamState::Idle,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn revealed(&self) -> usize {
        self.cursor
    }

    pub fn total_chars(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn prefix(&self) -> &str {
        &self.response[..self.boundaries[self.cursor]]
    }

    pub fn start(&mut self) -> bool {
        if self.state != StreamState::Idle {
            return false;
        }
        self.state = StreamState::Streaming;
        true
    }

    /// Advance by one chunk. The tick that reaches the end finalizes.
    pub fn tick(&mut self) -> Option<StreamUpdate> {
        if self.state != StreamState::Streaming {
            return None;
        }

        self.cursor = (self.cursor + self.chunk_size).min(self.total_chars());
        let finished = self.cursor == self.total_chars();
        if finished {
            self.state = StreamState::Finalized;
        }

        Some(StreamUpdate {
            revealed: self.cursor,
            reply: detect_closed_fences(self.prefix()),
            finished,
        })
    }

    /// Cancel; whatever has been revealed becomes the final text.
    pub fn stop(&mut self) -> Option<PartialReply> {
        self.finish_early(StreamState::Aborted)
    }

    /// Settle for the current prefix before the response is fully revealed.
    pub fn accept(&mut self) -> Option<PartialReply> {
        self.finish_early(StreamState::Finalized)
    }

    fn finish_early(&mut self, next: StreamState) -> Option<PartialReply> {
        if self.state != StreamState::Streaming {
            return None;
        }
        self.state = next;
        Some(detect_closed_fences(self.prefix()))
    }
}
