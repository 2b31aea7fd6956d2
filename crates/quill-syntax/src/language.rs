//! Language rules and syntax configuration loading.
//!
//! The configuration is a JSON document: a version string, a theme object
//! and a list of language rules. Exactly one rule is selected per
//! highlighting pass by matching the active file name against each rule's
//! extension list; no match means "no highlighting, errors only".
//!
//! Loading never fails outward: a missing or malformed document substitutes
//! the configuration compiled into the crate, and if even that cannot be
//! parsed a bare "Plain Text" rule is used (§ error taxonomy: configuration
//! failures are silent, logged at warn).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::SyntaxResult;
use crate::theme::Theme;

/// Default configuration shipped with the editor.
const BUILTIN_CONFIG: &str = include_str!("../assets/syntax.json");

/// Highlighting rules for one language.
///
/// The four `*_pattern` fields are carried through from the configuration
/// for tooling that wants them; the scanner classifies by character class
/// and does not consult them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageRule {
    pub name: String,
    pub file_extensions: Vec<String>,
    pub keywords: Vec<String>,
    pub comment_start: Option<String>,
    pub comment_end: Option<String>,
    pub line_comment: Option<String>,
    pub string_delimiters: Vec<String>,
    pub number_pattern: String,
    pub operator_pattern: String,
    pub function_pattern: String,
    pub type_pattern: String,
}

impl LanguageRule {
    /// The fallback rule: no keywords, no comments, no highlighting beyond
    /// the default category.
    pub fn plain_text() -> Self {
        Self {
            name: "Plain Text".to_string(),
            file_extensions: vec![".txt".to_string()],
            ..Self::default()
        }
    }

    /// Returns true if `file_name` ends with (or equals) one of this rule's
    /// extensions, case-insensitively.
    pub fn matches_file(&self, file_name: &str) -> bool {
        let file_name = file_name.to_lowercase();
        self.file_extensions.iter().any(|ext| {
            let ext = ext.to_lowercase();
            file_name.ends_with(&ext) || file_name == ext
        })
    }

    /// Returns true if `word` is one of this language's keywords.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }
}

/// The full syntax configuration: version, theme and language rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub languages: Vec<LanguageRule>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl SyntaxConfig {
    /// Loads a configuration document from a JSON file.
    pub fn load_from(path: impl AsRef<Path>) -> SyntaxResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            languages = config.languages.len(),
            "loaded syntax configuration"
        );
        Ok(config)
    }

    /// Loads `path` when given, degrading to the built-in configuration on
    /// any failure. This is the entry point sessions use: configuration
    /// problems must never surface as errors.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path.exists() => Self::load_from(path).unwrap_or_else(|error| {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "falling back to built-in syntax configuration"
                );
                Self::builtin()
            }),
            _ => Self::builtin(),
        }
    }

    /// The configuration compiled into the crate.
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_CONFIG).unwrap_or_else(|error| {
            tracing::warn!(%error, "built-in syntax configuration is invalid");
            Self::fallback()
        })
    }

    /// Last-resort configuration: default theme, a single Plain Text rule.
    pub fn fallback() -> Self {
        Self {
            version: default_version(),
            theme: Theme::default(),
            languages: vec![LanguageRule::plain_text()],
        }
    }

    /// Selects the rule for a file name. The first matching rule wins;
    /// `None` selects the errors-only passthrough mode.
    pub fn rule_for_file(&self, file_name: &str) -> Option<&LanguageRule> {
        self.languages.iter().find(|rule| rule.matches_file(file_name))
    }
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self::builtin()
    }
}
