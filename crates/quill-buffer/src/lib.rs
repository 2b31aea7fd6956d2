//! # Quill Buffer
//!
//! Text buffer for a single open file: the current text, the selection,
//! and a bounded snapshot history for undo/redo.
//!
//! The editing surface hands the buffer whole replacement strings (it owns
//! keystroke handling), so history is a stack of full-text snapshots rather
//! than operational deltas. Snapshots are bounded at [`MAX_SNAPSHOTS`];
//! the oldest entry is evicted when the limit is reached.

mod buffer;
mod history;
mod selection;

pub use buffer::TextBuffer;
pub use history::{History, MAX_SNAPSHOTS, Snapshot};
pub use selection::Selection;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("range {start}..{end} is out of bounds for a buffer of {len} bytes")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("offset {0} is not a character boundary")]
    NotACharBoundary(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = TextBuffer::new();
        assert!(buffer.is_empty());
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_buffer_from_text() {
        let buffer = TextBuffer::from_text("Hello, World!");
        assert_eq!(buffer.text(), "Hello, World!");
        assert_eq!(buffer.selection(), Selection::cursor(0));
        assert!(!buffer.is_modified());
    }

    #[test]
    fn test_update_and_undo_redo() {
        let mut buffer = TextBuffer::from_text("a");
        buffer.update("ab", Selection::cursor(2));
        buffer.update("abc", Selection::cursor(3));

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "ab");

        assert!(buffer.redo());
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_spliced_rejects_bad_range() {
        let buffer = TextBuffer::from_text("short");
        let result = buffer.spliced(Selection::new(2, 99), "x");
        assert!(matches!(
            result,
            Err(BufferError::RangeOutOfBounds { end: 99, .. })
        ));
    }
}
