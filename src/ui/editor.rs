use super::input_metrics::clamp_to_char_boundary_left;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Snapshot {
    buffer: String,
    cursor: usize,
}

/// Result of feeding one key to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// The key was not an editing key.
    Ignored,
    Changed,
    Submit(String),
}

/// Multi-line prompt buffer with undo/redo and submitted-line history.
#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    history_stash: Option<Snapshot>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl LineEditor {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn prev_boundary(&self, idx: usize) -> usize {
        let idx = clamp_to_char_boundary_left(&self.buffer, idx);
        self.buffer[..idx]
            .char_indices()
            .next_back()
            .map_or(0, |(pos, _)| pos)
    }

    fn next_boundary(&self, idx: usize) -> usize {
        let idx = clamp_to_char_boundary_left(&self.buffer, idx);
        self.buffer[idx..]
            .chars()
            .next()
            .map_or(self.buffer.len(), |ch| idx + ch.len_utf8())
    }

    fn line_start(&self) -> usize {
        self.buffer[..self.cursor].rfind('\n').map_or(0, |pos| pos + 1)
    }

    fn line_end(&self) -> usize {
        self.buffer[self.cursor..]
            .find('\n')
            .map_or(self.buffer.len(), |pos| self.cursor + pos)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            buffer: self.buffer.clone(),
            cursor: self.cursor,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.buffer = snapshot.buffer;
        self.cursor = clamp_to_char_boundary_left(&self.buffer, snapshot.cursor);
    }

    /// Record an undo point before a mutation; leaving history browsing.
    fn begin_edit(&mut self) {
        self.history_index = None;
        self.history_stash = None;
        self.undo_stack.push(self.snapshot());
        self.redo_stack.clear();
    }

    fn replace_range(&mut self, start: usize, end: usize, with: &str) -> bool {
        if start == end && with.is_empty() {
            return false;
        }
        self.begin_edit();
        self.buffer.replace_range(start..end, with);
        self.cursor = start + with.len();
        true
    }

    pub fn insert_str(&mut self, value: &str) -> bool {
        let cursor = clamp_to_char_boundary_left(&self.buffer, self.cursor);
        self.replace_range(cursor, cursor, value)
    }

    pub fn backspace(&mut self) -> bool {
        let start = self.prev_boundary(self.cursor);
        self.replace_range(start, self.cursor, "")
    }

    pub fn delete(&mut self) -> bool {
        let end = self.next_boundary(self.cursor);
        self.replace_range(self.cursor, end, "")
    }

    pub fn kill_to_line_start(&mut self) -> bool {
        let start = self.line_start();
        self.replace_range(start, self.cursor, "")
    }

    pub fn kill_to_line_end(&mut self) -> bool {
        let end = self.line_end();
        self.replace_range(self.cursor, end, "")
    }

    pub fn clear(&mut self) {
        if !self.buffer.is_empty() {
            self.replace_range(0, self.buffer.len(), "");
        }
    }

    /// Take the trimmed buffer if it holds anything; the raw text joins history.
    pub fn submit(&mut self) -> Option<String> {
        let value = self.buffer.trim().to_string();
        if value.is_empty() {
            return None;
        }
        if self.history.last() != Some(&self.buffer) {
            self.history.push(self.buffer.clone());
        }
        self.begin_edit();
        self.buffer.clear();
        self.cursor = 0;
        Some(value)
    }

    pub fn history_up(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        if self.history_index.is_none() {
            self.history_stash = Some(self.snapshot());
        }
        let index = match self.history_index {
            Some(idx) => idx.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.history_index = Some(index);
        self.buffer = self.history[index].clone();
        self.cursor = self.buffer.len();
        true
    }

    pub fn history_down(&mut self) -> bool {
        let Some(idx) = self.history_index else {
            return false;
        };
        if idx + 1 < self.history.len() {
            self.history_index = Some(idx + 1);
            self.buffer = self.history[idx + 1].clone();
            self.cursor = self.buffer.len();
        } else {
            self.history_index = None;
            match self.history_stash.take() {
                Some(stash) => self.restore(stash),
                None => {
                    self.buffer.clear();
                    self.cursor = 0;
                }
            }
        }
        true
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        self.redo_stack.push(self.snapshot());
        self.restore(previous);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push(self.snapshot());
        self.restore(next);
        true
    }

    fn move_to(&mut self, cursor: usize) -> bool {
        let moved = cursor != self.cursor;
        self.cursor = cursor;
        moved
    }

    pub fn apply_key(&mut self, key: KeyEvent) -> EditAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let multiline = self.buffer.contains('\n');

        let changed = match key.code {
            KeyCode::Enter if shift => self.insert_str("\n"),
            KeyCode::Char('j') if ctrl => self.insert_str("\n"),
            KeyCode::Enter => {
                return match self.submit() {
                    Some(value) => EditAction::Submit(value),
                    None => EditAction::Ignored,
                };
            }
            KeyCode::Char('z') | KeyCode::Char('Z') if ctrl && shift => self.redo(),
            KeyCode::Char('z') if ctrl => self.undo(),
            KeyCode::Char('u') if ctrl => self.kill_to_line_start(),
            KeyCode::Char('k') if ctrl => self.kill_to_line_end(),
            KeyCode::Char('a') if ctrl => self.move_to(self.line_start()),
            KeyCode::Char('e') if ctrl => self.move_to(self.line_end()),
            KeyCode::Char(_) if ctrl => return EditAction::Ignored,
            KeyCode::Char(ch) => self.insert_str(ch.encode_utf8(&mut [0u8; 4])),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_to(self.prev_boundary(self.cursor)),
            KeyCode::Right => self.move_to(self.next_boundary(self.cursor)),
            KeyCode::Home => self.move_to(self.line_start()),
            KeyCode::End => self.move_to(self.line_end()),
            KeyCode::Up if !multiline => self.history_up(),
            KeyCode::Down if !multiline => self.history_down(),
            _ => return EditAction::Ignored,
        };

        if changed {
            EditAction::Changed
        } else {
            EditAction::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_text(editor: &mut LineEditor, text: &str) {
        for ch in text.chars() {
            editor.apply_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn test_enter_submits_trimmed_text_and_clears() {
        let mut editor = LineEditor::default();
        assert_eq!(editor.apply_key(key(KeyCode::Enter)), EditAction::Ignored);

        type_text(&mut editor, "  fix the path ");
        assert_eq!(
            editor.apply_key(key(KeyCode::Enter)),
            EditAction::Submit("fix the path".to_string())
        );
        assert!(editor.is_empty());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_shift_enter_and_ctrl_j_insert_newlines() {
        let mut editor = LineEditor::default();
        type_text(&mut editor, "a");
        editor.apply_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut editor, "b");
        editor.apply_key(ctrl('j'));
        type_text(&mut editor, "c");
        assert_eq!(editor.buffer(), "a\nb\nc");
    }

    #[test]
    fn test_backspace_and_cursor_moves_respect_char_boundaries() {
        let mut editor = LineEditor::default();
        type_text(&mut editor, "héé");
        editor.apply_key(key(KeyCode::Left));
        editor.apply_key(key(KeyCode::Backspace));
        assert_eq!(editor.buffer(), "hé");
        assert_eq!(editor.cursor(), 1);
        editor.apply_key(key(KeyCode::Delete));
        assert_eq!(editor.buffer(), "h");
    }

    #[test]
    fn test_kill_commands_stop_at_line_edges() {
        let mut editor = LineEditor::default();
        editor.insert_str("first\nsecond line");
        editor.apply_key(ctrl('a'));
        editor.apply_key(key(KeyCode::Right));
        editor.apply_key(ctrl('k'));
        assert_eq!(editor.buffer(), "first\ns");
        editor.apply_key(ctrl('u'));
        assert_eq!(editor.buffer(), "first\n");
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut editor = LineEditor::default();
        type_text(&mut editor, "ab");
        editor.apply_key(ctrl('z'));
        assert_eq!(editor.buffer(), "a");
        editor.apply_key(KeyEvent::new(
            KeyCode::Char('z'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert_eq!(editor.buffer(), "ab");
    }

    #[test]
    fn test_history_browsing_restores_draft() {
        let mut editor = LineEditor::default();
        type_text(&mut editor, "one");
        editor.submit();
        type_text(&mut editor, "two");
        editor.submit();
        type_text(&mut editor, "draft");

        editor.apply_key(key(KeyCode::Up));
        assert_eq!(editor.buffer(), "two");
        editor.apply_key(key(KeyCode::Up));
        assert_eq!(editor.buffer(), "one");
        editor.apply_key(key(KeyCode::Down));
        editor.apply_key(key(KeyCode::Down));
        assert_eq!(editor.buffer(), "draft");
    }

    #[test]
    fn test_unbound_control_keys_are_left_to_the_caller() {
        let mut editor = LineEditor::default();
        assert_eq!(editor.apply_key(ctrl('y')), EditAction::Ignored);
        assert_eq!(editor.apply_key(ctrl('t')), EditAction::Ignored);
        assert!(editor.is_empty());
    }
}
