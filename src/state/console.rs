use super::copy::CopyIndicator;
use super::seed::demo_conversation;
use crate::actions::{request_apply, ApplyTarget, Clipboard};
use crate::config::{Config, DEMO_RESPONSE};
use crate::message::{extract_code_suggestions, layout_message, MessageSegment};
use crate::stream::{PartialReply, StreamSimulator};
use crate::types::{CodeAttachment, Message, MessageId, MessageRole};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Address of one rendered code block: the owning message and the block's
/// position in that message's suggestions ++ attachments list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub message: MessageId,
    pub index: usize,
}

#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    /// The loading entry is showing; the reply starts streaming at `ready_at`.
    Waiting { ready_at: Instant, response: String },
    Streaming {
        message_id: MessageId,
        simulator: StreamSimulator,
        next_tick_at: Instant,
    },
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    chunk_size: usize,
    tick_interval: Duration,
    response_delay: Duration,
    copy_reset: Duration,
}

#[derive(Debug, Clone, Copy)]
enum Finish {
    Stop,
    Accept,
}

/// Message list plus the single in-flight reply.
pub struct ConsoleState {
    messages: Vec<Message>,
    next_id: u64,
    phase: Phase,
    timing: Timing,
    response: String,
    copy_indicators: HashMap<BlockKey, CopyIndicator>,
    status: Option<String>,
}

impl ConsoleState {
    /// State seeded with the startup conversation.
    pub fn new(config: &Config) -> Self {
        let mut state = Self::empty(config);
        state.messages = demo_conversation();
        state.next_id = state
            .messages
            .iter()
            .map(|message| message.id.0)
            .max()
            .unwrap_or(0)
            + 1;
        state
    }

    pub fn empty(config: &Config) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            phase: Phase::Idle,
            timing: Timing {
                chunk_size: config.chunk_size,
                tick_interval: config.tick_interval,
                response_delay: config.response_delay,
                copy_reset: config.copy_reset,
            },
            response: config.response.clone(),
            copy_indicators: HashMap::new(),
            status: None,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_generating(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    pub fn tick_interval(&self) -> Duration {
        self.timing.tick_interval
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Append a user message and schedule the canned reply.
    ///
    /// Blank input is dropped, and so is anything sent while a reply is
    /// pending or streaming.
    pub fn send(&mut self, text: &str, now: Instant) -> Option<MessageId> {
        let text = text.trim();
        if text.is_empty() || self.is_generating() {
            return None;
        }

        let id = self.allocate_id();
        let message = Message::user(id, text);
        report_rejected_suggestions(&message);
        self.messages.push(message);
        tracing::info!(message = %id, chars = text.chars().count(), "user message sent");

        self.begin_reply(self.response.clone(), now);
        Some(id)
    }

    /// Stream the demo reply without a user turn.
    pub fn start_demo(&mut self, now: Instant) -> bool {
        if self.is_generating() {
            return false;
        }
        tracing::info!("streaming demo started");
        self.begin_reply(DEMO_RESPONSE.to_string(), now);
        true
    }

    pub fn stop(&mut self) -> bool {
        self.finish(Finish::Stop)
    }

    pub fn accept(&mut self) -> bool {
        self.finish(Finish::Accept)
    }

    /// Drop every message and any reply in flight.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.phase = Phase::Idle;
        self.copy_indicators.clear();
        self.status = None;
        tracing::info!("conversation cleared");
    }

    /// Advance timers to `now`. Returns whether anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let copies_changed = self.expire_copy_indicators(now);
        let phase_changed = self.advance_phase(now);
        copies_changed || phase_changed
    }

    /// Every code block in render order.
    pub fn code_blocks(&self) -> Vec<BlockKey> {
        self.messages
            .iter()
            .filter(|message| message.role != MessageRole::Loading)
            .flat_map(|message| {
                layout_message(message.display_text(), &message.attachments)
                    .into_iter()
                    .filter_map(move |segment| match segment {
                        MessageSegment::Code { index, .. } => Some(BlockKey {
                            message: message.id,
                            index,
                        }),
                        _ => None,
                    })
            })
            .collect()
    }

    pub fn attachment_at(&self, key: BlockKey) -> Option<CodeAttachment> {
        let message = self.messages.iter().find(|m| m.id == key.message)?;
        layout_message(message.display_text(), &message.attachments)
            .into_iter()
            .find_map(|segment| match segment {
                MessageSegment::Code { index, attachment } if index == key.index => {
                    Some(attachment)
                }
                _ => None,
            })
    }

    pub fn is_copied(&self, key: BlockKey) -> bool {
        self.copy_indicators
            .get(&key)
            .is_some_and(CopyIndicator::is_copied)
    }

    /// Put the block's exact code on the clipboard and flip its indicator.
    /// A clipboard failure is logged; the indicator flips regardless.
    pub fn copy_block(&mut self, key: BlockKey, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        let Some(attachment) = self.attachment_at(key) else {
            return false;
        };

        if let Err(err) = clipboard.set_text(attachment.code()) {
            tracing::warn!(error = %err, message = %key.message, "clipboard write failed");
        }
        self.copy_indicators
            .entry(key)
            .or_default()
            .mark(now + self.timing.copy_reset);
        self.status = Some("Copied to clipboard".to_string());
        true
    }

    pub fn apply_block(&mut self, key: BlockKey, target: Option<&mut dyn ApplyTarget>) -> bool {
        let Some(attachment) = self.attachment_at(key) else {
            return false;
        };
        let applied = request_apply(target, attachment.code(), attachment.file_name());
        if let (true, Some(file)) = (applied, attachment.file_name()) {
            self.status = Some(format!("Apply requested for {file}"));
        }
        applied
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn begin_reply(&mut self, response: String, now: Instant) {
        let id = self.allocate_id();
        self.messages.push(Message::loading(id));
        self.phase = Phase::Waiting {
            ready_at: now + self.timing.response_delay,
            response,
        };
    }

    fn drop_loading(&mut self) {
        self.messages
            .retain(|message| message.role != MessageRole::Loading);
    }

    fn advance_phase(&mut self, now: Instant) -> bool {
        if let Phase::Waiting { ready_at, response } = &mut self.phase {
            if now < *ready_at {
                return false;
            }
            let response = std::mem::take(response);
            self.start_stream(response, now);
            return true;
        }
        self.advance_stream(now)
    }

    fn start_stream(&mut self, response: String, now: Instant) {
        self.drop_loading();
        let id = self.allocate_id();
        self.messages.push(Message::streaming_placeholder(id));

        let mut simulator = StreamSimulator::new(response, self.timing.chunk_size);
        simulator.start();
        tracing::debug!(
            message = %id,
            chars = simulator.total_chars(),
            chunk = self.timing.chunk_size,
            "reply streaming"
        );
        self.phase = Phase::Streaming {
            message_id: id,
            simulator,
            next_tick_at: now + self.timing.tick_interval,
        };
    }

    fn advance_stream(&mut self, now: Instant) -> bool {
        let Phase::Streaming {
            message_id,
            simulator,
            next_tick_at,
        } = &mut self.phase
        else {
            return false;
        };
        let message_id = *message_id;

        // Catch up on every period that elapsed since the last call.
        let mut latest = None;
        while now >= *next_tick_at {
            let Some(update) = simulator.tick() else {
                break;
            };
            *next_tick_at += self.timing.tick_interval;
            let finished = update.finished;
            latest = Some(update);
            if finished {
                break;
            }
        }

        let Some(update) = latest else {
            return false;
        };
        if update.finished {
            self.phase = Phase::Idle;
            self.finalize_reply(message_id, update.reply);
            tracing::info!(message = %message_id, chars = update.revealed, "reply completed");
        } else if let Some(message) = self.message_mut(message_id) {
            message.partial = Some(update.reply.text);
            message.attachments = update.reply.attachments;
        }
        true
    }

    fn finish(&mut self, finish: Finish) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Waiting { .. } => {
                self.drop_loading();
                tracing::info!(?finish, "reply cancelled before streaming");
                true
            }
            Phase::Streaming {
                message_id,
                mut simulator,
                ..
            } => {
                let reply = match finish {
                    Finish::Stop => simulator.stop(),
                    Finish::Accept => simulator.accept(),
                };
                let Some(reply) = reply else {
                    return false;
                };
                tracing::info!(
                    ?finish,
                    message = %message_id,
                    chars = simulator.revealed(),
                    "reply finalized early"
                );
                self.finalize_reply(message_id, reply);
                true
            }
        }
    }

    fn finalize_reply(&mut self, id: MessageId, reply: PartialReply) {
        if let Some(message) = self.message_mut(id) {
            message.content = reply.text;
            message.attachments = reply.attachments;
            message.streaming = false;
            message.partial = None;
            report_rejected_suggestions(message);
        }
    }

    fn message_mut(&mut self, id: MessageId) -> Option<&mut Message> {
        self.messages.iter_mut().find(|message| message.id == id)
    }

    fn expire_copy_indicators(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for indicator in self.copy_indicators.values_mut() {
            changed |= indicator.expire(now);
        }
        self.copy_indicators
            .retain(|_, indicator| !indicator.is_settled());
        changed
    }
}

/// Warn about unreadable `code-suggestions` fences. Called once when a
/// message's text becomes final; layout itself stays silent.
fn report_rejected_suggestions(message: &Message) {
    for rejected in extract_code_suggestions(&message.content).rejected {
        tracing::warn!(
            message = %message.id,
            block = rejected.block,
            error = %rejected.reason,
            "failed to parse code suggestions"
        );
    }
}
