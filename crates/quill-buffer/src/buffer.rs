//! Snapshot-based text buffer.
//!
//! The buffer owns the current text, the selection, the undo/redo history
//! and the dirty flag for one open-file session. All content changes funnel
//! through [`TextBuffer::update`], which is where history recording and
//! dirty tracking happen; selection-only changes bypass both.
//!
//! Dirty tracking is "an edit operation occurred since the last save", not
//! "content differs from disk": undo and redo both set the flag even when
//! they restore previously saved content.

use unicode_segmentation::UnicodeSegmentation;

use crate::history::{History, Snapshot};
use crate::selection::Selection;
use crate::{BufferError, BufferResult};

/// The text, selection and edit history of a single open file.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    /// Current text content
    text: String,
    /// Current selection (caret when zero-width)
    selection: Selection,
    /// Undo/redo snapshots
    history: History,
    /// Whether an edit occurred since the last save
    modified: bool,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer with initial content and the caret at the start.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    // ==================== Accessors ====================

    /// Returns the current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the text covered by the current selection.
    pub fn selected_text(&self) -> &str {
        self.selection.slice(&self.text).unwrap_or("")
    }

    /// Returns true if an edit occurred since the last save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns the edit history.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    // ==================== Editing ====================

    /// Replaces the buffer content and selection.
    ///
    /// When the text actually differs, the outgoing state is pushed onto the
    /// undo stack (evicting the oldest snapshot at capacity), the redo stack
    /// is cleared and the buffer becomes dirty. A selection-only change
    /// updates the selection without touching history or the dirty flag.
    pub fn update(&mut self, new_text: impl Into<String>, new_selection: Selection) {
        let new_text = new_text.into();

        if new_text != self.text {
            self.history
                .push(Snapshot::new(self.text.clone(), self.selection));
            self.selection = new_selection.clamped_to(&new_text);
            self.text = new_text;
            self.modified = true;
        } else {
            self.selection = new_selection.clamped_to(&self.text);
        }
    }

    /// Moves the selection without recording history.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection.clamped_to(&self.text);
    }

    /// Computes the text and caret that result from replacing `range` with
    /// `replacement`, without mutating the buffer. The caret lands
    /// immediately after the inserted text.
    pub fn spliced(
        &self,
        range: Selection,
        replacement: &str,
    ) -> BufferResult<(String, Selection)> {
        if range.end > self.text.len() {
            return Err(BufferError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.text.len(),
            });
        }
        for offset in [range.start, range.end] {
            if !self.text.is_char_boundary(offset) {
                return Err(BufferError::NotACharBoundary(offset));
            }
        }

        let mut text = self.text.clone();
        text.replace_range(range.start..range.end, replacement);
        let caret = Selection::cursor(range.start + replacement.len());
        Ok((text, caret))
    }

    /// Restores the previous snapshot. Returns false when the undo stack is
    /// empty. Marks the buffer dirty even when the restored content matches
    /// the last-saved state.
    pub fn undo(&mut self) -> bool {
        let current = Snapshot::new(self.text.clone(), self.selection);
        match self.history.undo(current) {
            Some(snapshot) => {
                self.text = snapshot.text;
                self.selection = snapshot.selection;
                self.modified = true;
                true
            }
            None => false,
        }
    }

    /// Re-applies the most recently undone snapshot. Returns false when the
    /// redo stack is empty. Marks the buffer dirty.
    pub fn redo(&mut self) -> bool {
        let current = Snapshot::new(self.text.clone(), self.selection);
        match self.history.redo(current) {
            Some(snapshot) => {
                self.text = snapshot.text;
                self.selection = snapshot.selection;
                self.modified = true;
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ==================== Session boundaries ====================

    /// Replaces the content for a newly opened (or new blank) file: caret at
    /// the start, history cleared, dirty flag cleared.
    pub fn reset(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.selection = Selection::cursor(0);
        self.history.clear();
        self.modified = false;
    }

    /// Clears the dirty flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    // ==================== Statistics ====================

    /// Number of characters in the buffer.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of unicode words in the buffer.
    pub fn word_count(&self) -> usize {
        self.text.unicode_words().count()
    }

    /// Number of lines (separator: `\n`). An empty buffer has one line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}
