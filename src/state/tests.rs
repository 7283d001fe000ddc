use super::*;
use crate::actions::testing::RecordingClipboard;
use crate::actions::LoggingApplyTarget;
use crate::config::Config;
use crate::types::{CodeAttachment, MessageId, MessageRole};
use std::time::{Duration, Instant};

const RESPONSE_32: &str = "abcdefghijklmnopqrstuvwxyz012345";

fn config_with_response(response: &str, chunk_size: usize) -> Config {
    Config {
        chunk_size,
        response: response.to_string(),
        ..Config::default()
    }
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Send a message and advance past the response delay so streaming has begun.
fn streaming_state(response: &str, chunk_size: usize) -> (ConsoleState, Instant) {
    let mut state = ConsoleState::empty(&config_with_response(response, chunk_size));
    let start = Instant::now();
    state.send("hello", start).unwrap();
    assert!(state.tick(start + ms(500)));
    (state, start + ms(500))
}

fn last_message(state: &ConsoleState) -> &crate::types::Message {
    state.messages().last().unwrap()
}

#[test]
fn test_seeded_conversation_exposes_its_code_blocks() {
    let state = ConsoleState::new(&Config::default());
    assert_eq!(state.messages().len(), 3);
    assert!(!state.is_generating());

    let blocks = state.code_blocks();
    assert_eq!(
        blocks,
        vec![
            BlockKey { message: MessageId(2), index: 0 },
            BlockKey { message: MessageId(3), index: 0 },
            BlockKey { message: MessageId(3), index: 1 },
        ]
    );
    match state.attachment_at(blocks[0]) {
        Some(CodeAttachment::Snippet(snippet)) => assert!(snippet.is_removed),
        other => panic!("unexpected attachment: {other:?}"),
    }
}

#[test]
fn test_send_appends_user_and_loading_then_ignores_further_sends() {
    let mut state = ConsoleState::new(&Config::default());
    let now = Instant::now();

    assert_eq!(state.send("   ", now), None);
    let id = state.send("  still broken ", now).unwrap();
    assert_eq!(id, MessageId(4));

    let roles: Vec<MessageRole> = state.messages()[3..].iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![MessageRole::User, MessageRole::Loading]);
    assert_eq!(state.messages()[3].content, "still broken");
    assert!(state.is_generating());

    assert_eq!(state.send("again", now), None);
    assert_eq!(state.messages().len(), 5);
}

#[test]
fn test_reply_streams_in_chunks_after_the_delay() {
    let mut state = ConsoleState::empty(&config_with_response(RESPONSE_32, 15));
    let start = Instant::now();
    state.send("go", start).unwrap();

    assert!(!state.tick(start + ms(499)));
    assert_eq!(last_message(&state).role, MessageRole::Loading);

    assert!(state.tick(start + ms(500)));
    assert!(state
        .messages()
        .iter()
        .all(|m| m.role != MessageRole::Loading));
    assert!(last_message(&state).streaming);
    assert_eq!(last_message(&state).display_text(), "");

    let mut revealed = Vec::new();
    for step in 1..=3 {
        assert!(state.tick(start + ms(500 + step * 100)));
        revealed.push(last_message(&state).display_text().chars().count());
    }
    assert_eq!(revealed, vec![15, 30, 32]);

    let reply = last_message(&state);
    assert!(!reply.streaming);
    assert_eq!(reply.content, RESPONSE_32);
    assert!(!state.is_generating());
    assert!(!state.tick(start + ms(900)));
}

#[test]
fn test_stop_freezes_reply_at_current_prefix() {
    let (mut state, now) = streaming_state(RESPONSE_32, 15);
    state.tick(now + ms(100));

    assert!(state.stop());
    let reply = last_message(&state);
    assert_eq!(reply.content, &RESPONSE_32[..15]);
    assert!(!reply.streaming);
    assert!(!state.is_generating());

    let count = state.messages().len();
    assert!(!state.tick(now + ms(1000)));
    assert_eq!(state.messages().len(), count);
    assert_eq!(last_message(&state).content, &RESPONSE_32[..15]);
}

#[test]
fn test_finalize_happens_once() {
    let (mut state, now) = streaming_state(RESPONSE_32, 15);
    state.tick(now + ms(100));
    assert!(state.accept());
    let snapshot = state.messages().to_vec();

    assert!(!state.accept());
    assert!(!state.stop());
    assert_eq!(state.messages(), snapshot.as_slice());
}

#[test]
fn test_stop_before_first_chunk_keeps_an_empty_reply() {
    let (mut state, _) = streaming_state(RESPONSE_32, 15);
    assert!(state.stop());
    assert_eq!(last_message(&state).content, "");
    assert!(!last_message(&state).streaming);
}

#[test]
fn test_cancel_during_delay_drops_loading_without_reply() {
    let mut state = ConsoleState::empty(&config_with_response(RESPONSE_32, 15));
    let start = Instant::now();
    state.send("go", start).unwrap();

    assert!(state.stop());
    assert_eq!(state.messages().len(), 1);
    assert_eq!(state.messages()[0].role, MessageRole::User);
    assert!(!state.tick(start + ms(2000)));
    assert_eq!(state.messages().len(), 1);
}

#[test]
fn test_closed_fence_becomes_attachment_while_streaming() {
    let (mut state, now) = streaming_state("See:\n```ts\nrun();\n```\nok", 12);

    state.tick(now + ms(100));
    assert!(last_message(&state).attachments.is_empty());

    state.tick(now + ms(200));
    let reply = last_message(&state);
    assert_eq!(reply.content, "See:\n```code```\nok");
    assert_eq!(reply.attachments.len(), 1);
    assert_eq!(reply.attachments[0].code(), "run();");
    assert_eq!(
        state.code_blocks(),
        vec![BlockKey { message: reply.id, index: 0 }]
    );
}

#[test]
fn test_late_tick_catches_up_several_chunks() {
    let (mut state, now) = streaming_state(RESPONSE_32, 15);
    assert!(state.tick(now + ms(250)));
    assert_eq!(last_message(&state).display_text().chars().count(), 30);
}

#[test]
fn test_copy_submits_exact_code_and_resets_after_first_deadline() {
    let mut state = ConsoleState::new(&Config::default());
    let mut clipboard = RecordingClipboard::default();
    let key = BlockKey { message: MessageId(3), index: 1 };
    let start = Instant::now();

    assert!(state.copy_block(key, &mut clipboard, start));
    assert!(state.copy_block(key, &mut clipboard, start + ms(1000)));
    assert!(state.is_copied(key));
    assert_eq!(clipboard.copied.len(), 2);
    assert!(clipboard.copied[0].starts_with("export default defineConfig({"));

    assert!(state.tick(start + ms(2000)));
    assert!(!state.is_copied(key));
    assert!(!state.tick(start + ms(3000)));
}

#[test]
fn test_copy_flips_indicator_even_when_clipboard_fails() {
    let mut state = ConsoleState::new(&Config::default());
    let mut clipboard = RecordingClipboard {
        fail: true,
        ..RecordingClipboard::default()
    };
    let key = BlockKey { message: MessageId(2), index: 0 };

    assert!(state.copy_block(key, &mut clipboard, Instant::now()));
    assert!(state.is_copied(key));
    assert!(clipboard.copied.is_empty());

    let missing = BlockKey { message: MessageId(2), index: 5 };
    assert!(!state.copy_block(missing, &mut clipboard, Instant::now()));
}

#[test]
fn test_apply_needs_a_file_name() {
    let response = "Try this:\n```code-suggestions\n[{\"file\":\"fix.py\",\"description\":\"d\",\"newCode\":\"x = 1\\ny = 2\"}]\n```";
    let mut state = ConsoleState::new(&config_with_response(response, 1000));
    let now = Instant::now();
    state.send("fix it", now).unwrap();
    state.tick(now + ms(500));
    state.tick(now + ms(600));
    assert!(!state.is_generating());

    let mut target = LoggingApplyTarget::default();
    let snippet = BlockKey { message: MessageId(2), index: 0 };
    let suggestion = BlockKey {
        message: last_message(&state).id,
        index: 0,
    };

    assert!(!state.apply_block(snippet, Some(&mut target)));
    assert!(!state.apply_block(suggestion, None));
    assert!(state.apply_block(suggestion, Some(&mut target)));
    assert_eq!(
        target.applied,
        vec![("x = 1\ny = 2".to_string(), "fix.py".to_string())]
    );
    assert_eq!(state.status(), Some("Apply requested for fix.py"));
}

#[test]
fn test_clear_resets_messages_and_pending_reply() {
    let mut state = ConsoleState::new(&Config::default());
    let now = Instant::now();
    state.send("hi", now).unwrap();
    state.clear();

    assert!(state.messages().is_empty());
    assert!(!state.is_generating());
    assert!(!state.tick(now + ms(5000)));
    assert!(state.start_demo(now));
    assert!(!state.start_demo(now));
}

const BROKEN_SUGGESTIONS: &str = "see ```code-suggestions\n{oops}\n``` end";
const PARSE_WARNING: &str = "failed to parse code suggestions";

#[test]
fn test_unreadable_suggestions_warn_once_across_redraws() {
    let ((), logs) = crate::test_support::capture_logs(|| {
        let mut state = ConsoleState::empty(&Config::default());
        let theme = crate::ui::Theme::new(false);
        state.send(BROKEN_SUGGESTIONS, Instant::now()).unwrap();
        let message = state.messages()[0].clone();

        for _ in 0..10 {
            crate::ui::render_message(&message, &theme, &crate::ui::BlockDecor::plain(), 80, 0);
            assert!(state.code_blocks().is_empty());
            assert!(state
                .attachment_at(BlockKey { message: message.id, index: 0 })
                .is_none());
        }
    });

    assert_eq!(logs.matches(PARSE_WARNING).count(), 1);
}

#[test]
fn test_streamed_reply_with_unreadable_suggestions_warns_when_finalized() {
    let ((), logs) = crate::test_support::capture_logs(|| {
        let (mut state, now) = streaming_state(BROKEN_SUGGESTIONS, 8);
        for step in 1..=10 {
            state.tick(now + ms(step * 100));
        }
        assert!(!state.is_generating());
        for _ in 0..5 {
            state.code_blocks();
        }
        assert!(!state.stop());
    });

    assert_eq!(logs.matches(PARSE_WARNING).count(), 1);
}
