//! Wire types for the compile service.
//!
//! The response carries errors as bare strings, no line, column or
//! severity. [`CompileResponse::diagnostics`] reproduces that lossy
//! mapping faithfully: every error string becomes a position-less ERROR
//! diagnostic. A richer service can populate [`Diagnostic`] directly
//! without this detour.

use serde::{Deserialize, Serialize};

use quill_syntax::Diagnostic;

/// Request body for `POST /compile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub code: String,
    pub language: String,
    pub file_name: String,
}

impl CompileRequest {
    pub fn new(
        code: impl Into<String>,
        language: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            file_name: file_name.into(),
        }
    }
}

/// Response body from `POST /compile`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResponse {
    pub success: bool,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl CompileResponse {
    /// Maps the flat error strings into diagnostics: no position, severity
    /// fixed to ERROR.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|message| Diagnostic::error(message.clone()))
            .collect()
    }
}

/// Infers the service language tag from a file name. Unknown or missing
/// extensions default to Python.
pub fn language_for_file(file_name: Option<&str>) -> &'static str {
    let Some(file_name) = file_name else {
        return "python";
    };
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "kt" => "kotlin",
        "py" => "python",
        "java" => "java",
        "c" => "c",
        "cpp" | "cc" | "cxx" => "cpp",
        "js" => "javascript",
        "go" => "go",
        _ => "python",
    }
}

/// The default file extension for a service language tag.
pub fn default_extension(language: &str) -> &'static str {
    match language {
        "kotlin" => "kt",
        "python" => "py",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "javascript" => "js",
        "go" => "go",
        _ => "py",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_syntax::Severity;

    #[test]
    fn test_request_serializes_with_camel_case_keys() {
        let request = CompileRequest::new("print(1)", "python", "main.py");
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"fileName\":\"main.py\""));
        assert!(json.contains("\"language\":\"python\""));
    }

    #[test]
    fn test_response_parses_with_missing_fields() {
        let response: CompileResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert!(response.output.is_empty());
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_errors_become_position_less_error_diagnostics() {
        let response = CompileResponse {
            success: false,
            output: String::new(),
            errors: vec!["unresolved reference: foo".to_string()],
        };

        let diagnostics = response.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, None);
        assert_eq!(diagnostics[0].column, None);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "unresolved reference: foo");
    }

    #[test]
    fn test_language_inference() {
        assert_eq!(language_for_file(Some("Main.KT")), "kotlin");
        assert_eq!(language_for_file(Some("a.cc")), "cpp");
        assert_eq!(language_for_file(Some("noext")), "python");
        assert_eq!(language_for_file(None), "python");
    }

    #[test]
    fn test_default_extension_inverts_language() {
        for language in ["kotlin", "python", "java", "c", "cpp", "javascript", "go"] {
            let ext = default_extension(language);
            assert_eq!(language_for_file(Some(&format!("file.{ext}"))), language);
        }
    }
}
