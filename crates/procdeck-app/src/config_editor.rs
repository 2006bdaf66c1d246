//! Remote config-file editor.
//!
//! [`TextBuffer`] is a small multi-line text model with an undo stack.
//! [`ConfigEditorState`] pairs it with the last text fetched from the backend
//! so edits can be reset. A reset replaces the buffer contents as a full value
//! churn (cleared, then restored), which also drops the undo history.

use std::collections::BTreeSet;

use procdeck_core::ExecId;

/// Undo entries kept per buffer.
const MAX_UNDO: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
struct BufferState {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

/// Line-oriented text with a char-indexed cursor.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
    undo: Vec<BufferState>,
    /// Bumped every time the value is replaced wholesale.
    revision: u64,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            undo: Vec::new(),
            revision: 0,
        }
    }
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole value. Clears the undo history.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.row = 0;
        self.col = 0;
        self.undo.clear();
        self.revision += 1;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Cursor as (row, column in chars).
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    fn checkpoint(&mut self) {
        if self.undo.len() == MAX_UNDO {
            self.undo.remove(0);
        }
        self.undo.push(BufferState {
            lines: self.lines.clone(),
            row: self.row,
            col: self.col,
        });
    }

    pub fn undo(&mut self) -> bool {
        match self.undo.pop() {
            Some(state) => {
                self.lines = state.lines;
                self.row = state.row;
                self.col = state.col;
                true
            }
            None => false,
        }
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn insert_char(&mut self, c: char) {
        self.checkpoint();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.checkpoint();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert_str(at, s);
        self.col += s.chars().count();
    }

    pub fn insert_newline(&mut self) {
        self.checkpoint();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.row += 1;
        self.col = 0;
        self.lines.insert(self.row, rest);
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.checkpoint();
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            self.checkpoint();
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            self.checkpoint();
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            self.checkpoint();
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    /// The whitespace-delimited word ending at the cursor.
    pub fn word_before_cursor(&self) -> &str {
        let line = &self.lines[self.row];
        let end = byte_index(line, self.col);
        let head = &line[..end];
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        &head[start..]
    }
}

/// Pick the completion for `prefix`: the first candidate, in sorted order,
/// that is strictly longer and starts with it.
pub fn complete<'a>(prefix: &str, candidates: &'a BTreeSet<String>) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    candidates
        .iter()
        .find(|c| c.len() > prefix.len() && c.starts_with(prefix))
        .map(String::as_str)
}

/// One editing keystroke, already decoded from the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEdit {
    Insert(char),
    Newline,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Undo,
    /// Complete the word before the cursor
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorStatus {
    Loading,
    Ready,
    /// The initial fetch failed; nothing to edit or reset to
    Failed,
}

#[derive(Debug, Clone)]
pub struct ConfigEditorState {
    pub exec_id: ExecId,
    /// Tags the fetch that fills this editor; answers for other ids are stale
    pub fetch_id: u64,
    pub buffer: TextBuffer,
    pub status: EditorStatus,
    /// Last text successfully fetched from the backend
    remote: Option<String>,
    pub saving: bool,
    pub error: Option<String>,
}

impl ConfigEditorState {
    pub fn loading(exec_id: ExecId) -> Self {
        Self {
            exec_id,
            fetch_id: 0,
            buffer: TextBuffer::new(),
            status: EditorStatus::Loading,
            remote: None,
            saving: false,
            error: None,
        }
    }

    pub fn with_fetch_id(mut self, fetch_id: u64) -> Self {
        self.fetch_id = fetch_id;
        self
    }

    /// Install freshly fetched remote text.
    pub fn load_remote(&mut self, text: String) {
        self.buffer.set_text(&text);
        self.remote = Some(text);
        self.status = EditorStatus::Ready;
        self.error = None;
    }

    pub fn load_failed(&mut self, error: String) {
        self.status = EditorStatus::Failed;
        self.error = Some(error);
    }

    pub fn remote_text(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn is_ready(&self) -> bool {
        self.status == EditorStatus::Ready
    }

    pub fn is_dirty(&self) -> bool {
        self.remote
            .as_deref()
            .is_some_and(|remote| remote != self.buffer.text())
    }

    /// Discard local edits and restore the last fetched remote text.
    pub fn reset(&mut self) -> bool {
        let Some(remote) = self.remote.clone() else {
            return false;
        };
        self.buffer.set_text("");
        self.buffer.set_text(&remote);
        true
    }

    /// Mark a save as started and return the content to send.
    pub fn begin_save(&mut self) -> Option<String> {
        if !self.is_ready() || self.saving {
            return None;
        }
        self.saving = true;
        Some(self.buffer.text())
    }

    pub fn finish_save(&mut self) {
        self.saving = false;
    }

    /// Apply a keystroke. Edits are ignored until the text has loaded.
    pub fn apply(&mut self, edit: EditorEdit, candidates: &BTreeSet<String>) {
        if !self.is_ready() {
            return;
        }
        let buffer = &mut self.buffer;
        match edit {
            EditorEdit::Insert(c) => buffer.insert_char(c),
            EditorEdit::Newline => buffer.insert_newline(),
            EditorEdit::Backspace => buffer.backspace(),
            EditorEdit::Delete => buffer.delete(),
            EditorEdit::Left => buffer.move_left(),
            EditorEdit::Right => buffer.move_right(),
            EditorEdit::Up => buffer.move_up(),
            EditorEdit::Down => buffer.move_down(),
            EditorEdit::Home => buffer.move_home(),
            EditorEdit::End => buffer.move_end(),
            EditorEdit::Undo => {
                buffer.undo();
            }
            EditorEdit::Complete => {
                self.complete(candidates);
            }
        }
    }

    /// Complete the word before the cursor from `candidates`.
    pub fn complete(&mut self, candidates: &BTreeSet<String>) -> bool {
        let prefix = self.buffer.word_before_cursor().to_string();
        match complete(&prefix, candidates) {
            Some(full) => {
                let rest = full[prefix.len()..].to_string();
                self.buffer.insert_str(&rest);
                true
            }
            None => false,
        }
    }
}
