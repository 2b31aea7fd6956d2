//! # Quill Core
//!
//! Editor session logic: one [`EditorSession`] owns the buffer, the current
//! file, search options, diagnostics and compile state, and broadcasts
//! changes over an event bus. Around it sit the search/replace engine, the
//! workspace (file explorer) model, the editor configuration and the
//! auto-save task.
//!
//! The session is single-threaded by design: tokenizing, search and history
//! all run synchronously on the interaction thread. Only the compile
//! request and auto-save leave that thread, and both re-enter through
//! explicit session calls.

pub mod autosave;
pub mod config;
pub mod event;
pub mod search;
pub mod session;
pub mod workspace;

pub use config::EditorConfig;
pub use event::{EventBus, EventStream, SessionEvent};
pub use search::SearchOptions;
pub use session::{EditorSession, Highlighted};
pub use workspace::{FileChange, FileNode, Workspace};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations.
///
/// None of these are fatal: every failure path degrades to a status
/// message with prior in-memory state intact.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("no file is associated with the buffer")]
    NoFilePath,

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not inside the workspace: {0}")]
    OutsideWorkspace(String),

    #[error("buffer error: {0}")]
    Buffer(#[from] quill_buffer::BufferError),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
