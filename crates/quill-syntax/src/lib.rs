//! # Quill Syntax
//!
//! Rule-driven syntax highlighting for the editor.
//!
//! Highlighting is intentionally shallow: a single left-to-right scan maps
//! character classes to token categories using per-language rules loaded
//! from a JSON configuration. There is no parsing, no block-comment
//! nesting and no escape handling inside strings; the scanner's exact
//! behavior (including its unterminated-string fallback) is part of the
//! contract and covered by tests.
//!
//! Compiler diagnostics are layered on top as one-character marks computed
//! from (line, column) positions without altering the token spans.

mod highlighter;
mod language;
mod overlay;
mod theme;

pub use highlighter::{Highlighter, TokenCategory, TokenSpan, tokenize};
pub use language::{LanguageRule, SyntaxConfig};
pub use overlay::{Diagnostic, DiagnosticMark, Severity, overlay_marks};
pub use theme::{Color, Theme};

/// Result type for syntax operations
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors that can occur while loading syntax configuration.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("invalid color literal: {0:?}")]
    InvalidColor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_highlights_python() {
        let highlighter = Highlighter::new(SyntaxConfig::builtin());
        let spans = highlighter.highlight("def f():", Some("main.py"));

        assert!(!spans.is_empty());
        assert_eq!(spans[0].category, TokenCategory::Keyword);
    }

    #[test]
    fn test_unknown_extension_is_passthrough() {
        let highlighter = Highlighter::new(SyntaxConfig::builtin());
        let spans = highlighter.highlight("some text", Some("notes.xyz"));
        assert!(spans.is_empty());
    }
}
