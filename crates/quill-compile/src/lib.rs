//! # Quill Compile
//!
//! Client for the remote compile-and-run service.
//!
//! The service exposes a small HTTP contract: `POST /compile` takes the
//! buffer contents plus a language tag and returns success, program
//! output and a flat list of error strings; `GET /health` and
//! `GET /languages` are derived from the same base URL. The client is a
//! thin request/response wrapper; queuing, the single in-flight guard and
//! result handling live in the editor session.

mod client;
mod protocol;

pub use client::CompileClient;
pub use protocol::{CompileRequest, CompileResponse, default_extension, language_for_file};

/// Result type for compile-service operations
pub type CompileResult<T> = Result<T, CompileError>;

/// Errors that can occur talking to the compile service.
///
/// All of these are non-fatal: the session maps them to a status message
/// and an explanatory terminal panel, then returns to idle.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot reach the compile service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("compile service returned HTTP {status}: {body}")]
    ServiceStatus { status: u16, body: String },

    #[error("compile service returned invalid JSON: {body}")]
    InvalidBody {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}
