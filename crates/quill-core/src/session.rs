//! Editor session: the single owner of all mutable editing state.
//!
//! One `EditorSession` corresponds to one open buffer. Everything the
//! surface displays (text, selection, dirty flag, diagnostics, compile
//! output, status line) lives here and changes only through session
//! methods, which broadcast [`SessionEvent`]s for observers.
//!
//! The session itself is synchronous. The compile round-trip is split into
//! `begin_compile` (takes the single in-flight slot, builds the request)
//! and `finish_compile`/`fail_compile` (re-enter with the outcome), so the
//! HTTP call can run on a worker task without the session ever blocking.

use std::path::{Path, PathBuf};

use quill_buffer::{Selection, TextBuffer};
use quill_compile::{
    CompileError, CompileRequest, CompileResponse, default_extension, language_for_file,
};
use quill_syntax::{
    Diagnostic, DiagnosticMark, Highlighter, SyntaxConfig, TokenSpan, overlay_marks,
};

use crate::config::EditorConfig;
use crate::event::{EventBus, SessionEvent};
use crate::search::{self, SearchOptions};
use crate::workspace::Workspace;
use crate::{CoreError, CoreResult};

/// Token spans plus diagnostic marks for the current buffer.
#[derive(Debug, Clone)]
pub struct Highlighted {
    pub spans: Vec<TokenSpan>,
    pub marks: Vec<DiagnosticMark>,
}

/// The state of one open-file editing session.
pub struct EditorSession {
    buffer: TextBuffer,
    file_name: Option<String>,
    file_path: Option<PathBuf>,
    workspace: Option<Workspace>,
    search: SearchOptions,
    diagnostics: Vec<Diagnostic>,
    terminal_output: Option<String>,
    compiling: bool,
    compile_language: Option<String>,
    status: Option<String>,
    auto_save: bool,
    highlighter: Highlighter,
    config: EditorConfig,
    events: EventBus,
}

impl EditorSession {
    /// Creates a session with the user's syntax configuration (or the
    /// built-in rules when none is installed).
    pub fn new(config: EditorConfig) -> Self {
        let syntax = EditorConfig::load_syntax();
        Self::with_syntax(config, syntax)
    }

    /// Creates a session with an explicit syntax configuration.
    pub fn with_syntax(config: EditorConfig, syntax: SyntaxConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            file_name: None,
            file_path: None,
            workspace: None,
            search: SearchOptions::default(),
            diagnostics: Vec::new(),
            terminal_output: None,
            compiling: false,
            compile_language: None,
            status: None,
            auto_save: config.files.auto_save,
            highlighter: Highlighter::new(syntax),
            config,
            events: EventBus::new(),
        }
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn selection(&self) -> Selection {
        self.buffer.selection()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn is_compiling(&self) -> bool {
        self.compiling
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn terminal_output(&self) -> Option<&str> {
        self.terminal_output.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Takes and clears the pending status message.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn workspace_mut(&mut self) -> Option<&mut Workspace> {
        self.workspace.as_mut()
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.auto_save
    }

    pub fn toggle_auto_save(&mut self) {
        self.auto_save = !self.auto_save;
    }

    /// Subscribes to this session's events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    // ==================== Editing ====================

    /// Replaces the buffer content and selection (the one write path all
    /// edits go through).
    pub fn update_text(&mut self, text: impl Into<String>, selection: Selection) {
        let text = text.into();
        let text_changed = text != self.buffer.text();
        let was_dirty = self.buffer.is_modified();

        self.buffer.update(text, selection);

        if text_changed {
            self.events.emit(SessionEvent::BufferChanged);
            if !was_dirty {
                self.events.emit(SessionEvent::DirtyChanged(true));
            }
        } else {
            self.events.emit(SessionEvent::SelectionChanged);
        }
    }

    /// Moves the selection without touching history.
    pub fn set_selection(&mut self, selection: Selection) {
        self.buffer.set_selection(selection);
        self.events.emit(SessionEvent::SelectionChanged);
    }

    /// Replaces the currently selected text, caret landing after the
    /// insertion.
    pub fn replace_selection(&mut self, replacement: &str) -> CoreResult<()> {
        let (text, caret) = self.buffer.spliced(self.buffer.selection(), replacement)?;
        self.update_text(text, caret);
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        let was_dirty = self.buffer.is_modified();
        if self.buffer.undo() {
            self.events.emit(SessionEvent::BufferChanged);
            if !was_dirty {
                self.events.emit(SessionEvent::DirtyChanged(true));
            }
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        let was_dirty = self.buffer.is_modified();
        if self.buffer.redo() {
            self.events.emit(SessionEvent::BufferChanged);
            if !was_dirty {
                self.events.emit(SessionEvent::DirtyChanged(true));
            }
            true
        } else {
            false
        }
    }

    // ==================== Highlighting ====================

    /// Token spans and diagnostic marks for the current buffer. Recomputed
    /// from scratch on every call; no state is carried between calls.
    pub fn highlight(&self) -> Highlighted {
        Highlighted {
            spans: self
                .highlighter
                .highlight(self.buffer.text(), self.file_name.as_deref()),
            marks: overlay_marks(self.buffer.text(), &self.diagnostics),
        }
    }

    // ==================== File operations ====================

    /// Opens a file into the buffer, resetting history, diagnostics and
    /// compile output. On failure the previous state is left untouched and
    /// a status message is posted.
    pub fn open(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                self.set_status(format!("Error opening file: {error}"));
                return Err(error.into());
            }
        };

        self.buffer.reset(content);
        self.file_path = Some(path.to_path_buf());
        self.file_name = Some(display_name(path));
        self.clear_compile_state();

        tracing::info!(path = %path.display(), "opened file");
        self.events.emit(SessionEvent::FileOpened(path.to_path_buf()));
        self.events.emit(SessionEvent::DiagnosticsUpdated(0));
        Ok(())
    }

    /// Writes the buffer to its current file and clears the dirty flag.
    pub fn save(&mut self) -> CoreResult<()> {
        let Some(path) = self.file_path.clone() else {
            self.set_status("No file to save".to_string());
            return Err(CoreError::NoFilePath);
        };
        self.write_to(&path)
    }

    /// Writes the buffer to a new path and adopts it as the current file.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> CoreResult<()> {
        let path = path.into();
        self.write_to(&path)?;
        self.file_path = Some(path.clone());
        self.file_name = Some(display_name(&path));
        Ok(())
    }

    /// Resets the session to a new blank "Untitled" buffer.
    pub fn new_file(&mut self) {
        self.buffer.reset(String::new());
        self.file_path = None;
        self.file_name = Some("Untitled".to_string());
        self.clear_compile_state();
        self.events.emit(SessionEvent::FileReset);
    }

    fn write_to(&mut self, path: &Path) -> CoreResult<()> {
        // Write to a temporary file first, then rename (atomic write).
        let temp_path = path.with_extension("tmp");
        let result = std::fs::write(&temp_path, self.buffer.text())
            .and_then(|_| std::fs::rename(&temp_path, path));

        match result {
            Ok(()) => {
                self.buffer.mark_saved();
                self.set_status(format!("File saved: {}", display_name(path)));
                self.events.emit(SessionEvent::FileSaved(path.to_path_buf()));
                self.events.emit(SessionEvent::DirtyChanged(false));
                Ok(())
            }
            Err(error) => {
                self.set_status(format!("Error saving file: {error}"));
                Err(error.into())
            }
        }
    }

    // ==================== Workspace ====================

    /// Opens a workspace (file explorer root).
    pub fn open_workspace(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let exclude = self.config.files.exclude_dirs.clone();
        match Workspace::open(path.as_ref(), exclude) {
            Ok(workspace) => {
                self.workspace = Some(workspace);
                self.events.emit(SessionEvent::WorkspaceRefreshed);
                Ok(())
            }
            Err(error) => {
                self.set_status(format!("Error opening workspace: {error}"));
                Err(error)
            }
        }
    }

    /// Deletes a workspace path. Deleting the currently open file resets
    /// the buffer to a blank one.
    pub fn delete_path(&mut self, path: &Path) -> CoreResult<()> {
        let Some(workspace) = self.workspace.as_mut() else {
            self.set_status("No workspace open".to_string());
            return Err(CoreError::FileNotFound(path.display().to_string()));
        };

        let deleting_open_file = self
            .file_path
            .as_deref()
            .is_some_and(|open| open.starts_with(path));

        match workspace.delete(path) {
            Ok(()) => {
                if deleting_open_file {
                    self.new_file();
                }
                self.set_status(format!("Deleted: {}", display_name(path)));
                self.events.emit(SessionEvent::WorkspaceRefreshed);
                Ok(())
            }
            Err(error) => {
                self.set_status(format!("Error deleting: {error}"));
                Err(error)
            }
        }
    }

    // ==================== Find / replace ====================

    pub fn search_options(&self) -> &SearchOptions {
        &self.search
    }

    pub fn set_find_text(&mut self, text: impl Into<String>) {
        self.search.find_text = text.into();
    }

    pub fn set_replace_text(&mut self, text: impl Into<String>) {
        self.search.replace_text = text.into();
    }

    pub fn toggle_match_case(&mut self) {
        self.search.match_case = !self.search.match_case;
    }

    pub fn toggle_match_whole_word(&mut self) {
        self.search.match_whole_word = !self.search.match_whole_word;
    }

    /// Selects the next match after the current selection, wrapping to the
    /// top. No match anywhere: silent no-op.
    pub fn find_next(&mut self) {
        let Some(re) = self.search.pattern() else {
            return;
        };
        let from = self.buffer.selection().end;
        if let Some(selection) = search::find_next(self.buffer.text(), from, &re) {
            self.set_selection(selection);
        }
    }

    /// Replaces the current selection when it matches the find target,
    /// then always advances to the next match.
    ///
    /// This is replace-then-advance, not search-then-replace: a selection
    /// that does not match the target degrades to find-next alone.
    pub fn replace_next(&mut self) {
        if self.search.find_text.is_empty() {
            return;
        }

        let selection = self.buffer.selection();
        if !selection.is_cursor() {
            let selected = self.buffer.selected_text().to_string();
            if self.search.selection_matches(&selected) {
                let replacement = self.search.replace_text.clone();
                if let Err(error) = self.replace_selection(&replacement) {
                    tracing::warn!(%error, "replace skipped");
                }
            }
        }

        self.find_next();
    }

    /// Replaces every match in the buffer as a single undo step. No
    /// matches: no history entry, no event.
    pub fn replace_all(&mut self) {
        let Some(re) = self.search.pattern() else {
            return;
        };

        let new_text = search::replace_all(self.buffer.text(), &re, &self.search.replace_text);
        if new_text != self.buffer.text() {
            let selection = self.buffer.selection();
            self.update_text(new_text, selection);
        }
    }

    // ==================== Compile ====================

    /// Claims the single in-flight compile slot and builds the request.
    ///
    /// Returns `None` while a previous compile is outstanding; overlapping
    /// requests are refused, not queued. The caller performs the HTTP
    /// round-trip and re-enters through [`finish_compile`] or
    /// [`fail_compile`].
    ///
    /// [`finish_compile`]: EditorSession::finish_compile
    /// [`fail_compile`]: EditorSession::fail_compile
    pub fn begin_compile(&mut self) -> Option<CompileRequest> {
        if self.compiling {
            tracing::debug!("compile already in flight, request refused");
            return None;
        }

        let language = language_for_file(self.file_name.as_deref()).to_string();
        let file_name = self
            .file_name
            .clone()
            .unwrap_or_else(|| format!("temp.{}", default_extension(&language)));

        self.compiling = true;
        self.terminal_output = None;
        self.compile_language = Some(language.clone());
        self.set_status(format!("Compiling {language} code..."));
        self.events.emit(SessionEvent::CompileStarted);

        Some(CompileRequest::new(
            self.buffer.text(),
            language,
            file_name,
        ))
    }

    /// Applies a compile response: diagnostics (the service's error strings
    /// as position-less ERROR entries), terminal output and status.
    pub fn finish_compile(&mut self, response: CompileResponse) {
        let language = self.compile_language.take().unwrap_or_default();

        self.diagnostics = response.diagnostics();
        self.terminal_output = Some(terminal_text(&response));

        let status = if response.success {
            if response.errors.is_empty() {
                format!("{language} compilation and execution completed successfully")
            } else {
                format!(
                    "{language} compilation completed with {} warnings",
                    response.errors.len()
                )
            }
        } else {
            format!("{language} compilation failed: {} errors", response.errors.len())
        };
        self.set_status(status);

        self.compiling = false;
        self.events
            .emit(SessionEvent::DiagnosticsUpdated(self.diagnostics.len()));
        self.events.emit(SessionEvent::CompileFinished {
            success: response.success,
        });
    }

    /// Applies a failed compile round-trip (network error, bad response).
    /// Non-fatal: status + explanatory terminal output, back to idle.
    pub fn fail_compile(&mut self, error: &CompileError) {
        self.compile_language = None;
        self.diagnostics.clear();
        self.terminal_output = Some(format!("--- Compilation Error ---\nError: {error}"));
        self.set_status(format!("Compilation error: {error}"));

        self.compiling = false;
        self.events.emit(SessionEvent::DiagnosticsUpdated(0));
        self.events
            .emit(SessionEvent::CompileFinished { success: false });
    }

    /// Clears the terminal panel.
    pub fn clear_terminal_output(&mut self) {
        self.terminal_output = None;
    }

    // ==================== Status ====================

    fn set_status(&mut self, message: String) {
        self.events
            .emit(SessionEvent::StatusMessage(message.clone()));
        self.status = Some(message);
    }

    fn clear_compile_state(&mut self) {
        self.diagnostics.clear();
        self.terminal_output = None;
        self.compile_language = None;
    }
}

/// Formats the terminal panel text for a compile response.
fn terminal_text(response: &CompileResponse) -> String {
    if response.success {
        if response.errors.is_empty() {
            response.output.clone()
        } else {
            format!(
                "{}\n\n--- Warnings ---\n{}",
                response.output,
                response.errors.join("\n")
            )
        }
    } else if response.errors.is_empty() {
        response.output.clone()
    } else {
        format!(
            "{}\n--- Compilation Errors ---\n{}",
            response.output,
            response.errors.join("\n")
        )
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Untitled")
        .to_string()
}
