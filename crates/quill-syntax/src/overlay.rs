//! Diagnostic overlay: mapping compiler positions onto text offsets.
//!
//! Diagnostics arrive with optional 1-based (line, column) positions. The
//! overlay turns each positioned diagnostic into a one-character mark
//! (underline + severity color) at the computed byte offset, clamped to
//! its line. The pass is stateless and never touches the token spans; it
//! is recomputed from scratch whenever the text or the diagnostics list
//! changes.
//!
//! Fail-open throughout: out-of-range lines are dropped silently, a
//! missing column means column 1, and unknown severities render in the
//! error color.

use serde::{Deserialize, Serialize};

use crate::theme::Color;

/// Diagnostic severity reported by a compiler or service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
    /// Catch-all for wire values this editor does not know.
    #[serde(other)]
    Unknown,
}

impl Severity {
    /// Display color: red for errors, amber for warnings, blue for info.
    /// Unrecognized severities map to the error color.
    pub fn color(self) -> Color {
        match self {
            Severity::Warning => Color::rgb(0xFF, 0x98, 0x00),
            Severity::Info => Color::rgb(0x21, 0x96, 0xF3),
            Severity::Error | Severity::Unknown => Color::rgb(0xFF, 0x00, 0x00),
        }
    }
}

/// An issue reported by a compiler or the compile service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based source line, when the reporter provides one
    pub line: Option<usize>,
    /// 1-based source column, when the reporter provides one
    pub column: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(
        line: Option<usize>,
        column: Option<usize>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            severity,
        }
    }

    /// A position-less error, the shape the compile service produces.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(None, None, message, Severity::Error)
    }
}

/// A one-character visual mark over the text (half-open byte range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMark {
    pub start: usize,
    pub end: usize,
    pub severity: Severity,
}

/// Computes overlay marks for every positioned diagnostic.
///
/// Line starts are the summed lengths of the preceding lines plus one
/// separator byte each. The mark offset is `line_start + clamp(column - 1,
/// 0, line_len)`; the mark is one character wide, clamped to the line end
/// (which makes marks on empty lines zero-width). Diagnostics without a
/// line, with an out-of-range line, or whose offset lands at or past the
/// end of the text produce no mark. Overlaps are preserved in list order.
pub fn overlay_marks(text: &str, diagnostics: &[Diagnostic]) -> Vec<DiagnosticMark> {
    if diagnostics.is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text.split('\n').collect();
    let mut marks = Vec::new();

    for diagnostic in diagnostics {
        let Some(line) = diagnostic.line else {
            continue;
        };
        if line < 1 || line > lines.len() {
            tracing::debug!(line, message = %diagnostic.message, "diagnostic line out of range");
            continue;
        }

        let index = line - 1;
        let line_start: usize = lines[..index].iter().map(|l| l.len() + 1).sum();
        let line_len = lines[index].len();

        let column_offset = diagnostic.column.unwrap_or(1).saturating_sub(1);
        let start = line_start + column_offset.min(line_len);
        let end = (start + 1).min(line_start + line_len);

        if start >= text.len() {
            continue;
        }

        marks.push(DiagnosticMark {
            start,
            end,
            severity: diagnostic.severity,
        });
    }

    marks
}
