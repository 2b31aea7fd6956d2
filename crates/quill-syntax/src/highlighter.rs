//! Single-pass tokenizer.
//!
//! One left-to-right scan, no backtracking. Every byte of the input lands
//! in exactly one span: the spans tile `[0, len)` in order, with whitespace
//! and unclassified characters carried as `Default`. That tiling property
//! is what the rendering side relies on and is asserted by tests.
//!
//! Known, deliberate limitations: no block comments, no escape sequences
//! inside strings, no multi-character operators. An unterminated string
//! runs to the end of its line (or the end of the text) and is still a
//! string span, not an error.

use crate::language::{LanguageRule, SyntaxConfig};
use crate::theme::Theme;

/// Classification of a token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Keyword,
    String,
    Comment,
    Number,
    Operator,
    /// Addressable by themes, never produced by the scanner.
    Function,
    /// Addressable by themes, never produced by the scanner.
    Type,
    Default,
}

/// A contiguous, categorized run of characters (half-open byte range).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub category: TokenCategory,
}

impl TokenSpan {
    fn new(start: usize, end: usize, category: TokenCategory) -> Self {
        Self {
            start,
            end,
            category,
        }
    }

    /// Returns the covered slice of `text`.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Characters classified as single-character operators.
const OPERATORS: &[char] = &[
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', '^', '~', '?', ':',
];

/// Resolves language rules and themes for highlighting passes.
#[derive(Debug, Clone)]
pub struct Highlighter {
    config: SyntaxConfig,
}

impl Highlighter {
    pub fn new(config: SyntaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SyntaxConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    /// Highlights `text` for the given file name.
    ///
    /// Returns an empty span list when no language rule matches the file
    /// name (or none is given): the text is rendered as-is, with only the
    /// diagnostic overlay applied on top.
    pub fn highlight(&self, text: &str, file_name: Option<&str>) -> Vec<TokenSpan> {
        let rule = match file_name.and_then(|name| self.config.rule_for_file(name)) {
            Some(rule) => rule,
            None => {
                tracing::trace!(?file_name, "no language rule, passthrough");
                return Vec::new();
            }
        };
        tokenize(text, rule)
    }
}

/// Scans `text` under `rule` into an ordered, gap-free span sequence.
pub fn tokenize(text: &str, rule: &LanguageRule) -> Vec<TokenSpan> {
    use TokenCategory::*;

    let bytes = text.as_bytes();
    let len = text.len();
    let mut spans = Vec::new();
    let mut at = 0;

    while at < len {
        let rest = &text[at..];
        let Some(c) = rest.chars().next() else { break };

        // Whitespace: one default span per character.
        if c.is_whitespace() {
            spans.push(TokenSpan::new(at, at + c.len_utf8(), Default));
            at += c.len_utf8();
            continue;
        }

        // Line comment through end of line (newline excluded).
        if let Some(marker) = rule.line_comment.as_deref() {
            if !marker.is_empty() && rest.starts_with(marker) {
                let end = rest.find('\n').map_or(len, |nl| at + nl);
                spans.push(TokenSpan::new(at, end, Comment));
                at = end;
                continue;
            }
        }

        // String: through the closing delimiter when it occurs before the
        // next newline; otherwise to the end of the line (unterminated
        // fallback), or the whole remainder when no newline exists.
        if c == '"' || c == '\'' {
            let line_end = rest.find('\n').unwrap_or(rest.len());
            let span_len = match rest[1..line_end].find(c) {
                Some(close) => 1 + close + 1,
                None => line_end,
            };
            spans.push(TokenSpan::new(at, at + span_len, String));
            at += span_len;
            continue;
        }

        // Word: maximal [A-Za-z0-9_] run started by a letter or underscore.
        if c == '_' || c.is_ascii_alphabetic() {
            let mut end = at + 1;
            while end < len && (bytes[end] == b'_' || bytes[end].is_ascii_alphanumeric()) {
                end += 1;
            }
            let category = if rule.is_keyword(&text[at..end]) {
                Keyword
            } else {
                Default
            };
            spans.push(TokenSpan::new(at, end, category));
            at = end;
            continue;
        }

        // Number: digits, optional fraction, optional one-letter suffix.
        if c.is_ascii_digit() {
            let mut end = at + 1;
            while end < len && bytes[end].is_ascii_digit() {
                end += 1;
            }
            if end < len
                && bytes[end] == b'.'
                && end + 1 < len
                && bytes[end + 1].is_ascii_digit()
            {
                end += 2;
                while end < len && bytes[end].is_ascii_digit() {
                    end += 1;
                }
            }
            if end < len && matches!(bytes[end], b'f' | b'F' | b'l' | b'L') {
                end += 1;
            }
            spans.push(TokenSpan::new(at, end, Number));
            at = end;
            continue;
        }

        if OPERATORS.contains(&c) {
            spans.push(TokenSpan::new(at, at + 1, Operator));
            at += 1;
            continue;
        }

        // Anything else: one default span per character.
        spans.push(TokenSpan::new(at, at + c.len_utf8(), Default));
        at += c.len_utf8();
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule() -> LanguageRule {
        LanguageRule {
            name: "Test".to_string(),
            file_extensions: vec![".t".to_string()],
            keywords: vec!["if".to_string(), "else".to_string()],
            line_comment: Some("//".to_string()),
            ..LanguageRule::default()
        }
    }

    fn categories(text: &str) -> Vec<(String, TokenCategory)> {
        tokenize(text, &rule())
            .into_iter()
            .map(|s| (s.slice(text).to_string(), s.category))
            .collect()
    }

    fn assert_tiles(text: &str, spans: &[TokenSpan]) {
        let mut at = 0;
        for span in spans {
            assert_eq!(span.start, at, "gap or overlap at {at} in {text:?}");
            assert!(span.end > span.start || text.is_empty());
            at = span.end;
        }
        assert_eq!(at, text.len(), "spans do not cover {text:?}");
        let rebuilt: String = spans.iter().map(|s| s.slice(text)).collect();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_keyword_and_comment_example() {
        let text = "if (x) { } // c";
        let spans = tokenize(text, &rule());
        assert_tiles(text, &spans);

        let cats = categories(text);
        assert_eq!(cats[0], ("if".to_string(), TokenCategory::Keyword));
        assert_eq!(
            cats.last().unwrap(),
            &("// c".to_string(), TokenCategory::Comment)
        );
    }

    #[test]
    fn test_comment_runs_to_end_of_line_only() {
        let text = "a // one\nb";
        let cats = categories(text);
        assert!(cats.contains(&("// one".to_string(), TokenCategory::Comment)));
        assert!(cats.contains(&("b".to_string(), TokenCategory::Default)));
    }

    #[test]
    fn test_terminated_string_includes_delimiters() {
        let cats = categories(r#"x = "abc" y"#);
        assert!(cats.contains(&("\"abc\"".to_string(), TokenCategory::String)));
    }

    #[test]
    fn test_unterminated_string_spans_remainder() {
        let text = "\"abc";
        let cats = categories(text);
        assert_eq!(cats, vec![("\"abc".to_string(), TokenCategory::String)]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let text = "\"abc\ndef";
        let cats = categories(text);
        assert_eq!(cats[0], ("\"abc".to_string(), TokenCategory::String));
        // The newline itself is whitespace, not part of the string.
        assert_eq!(cats[1], ("\n".to_string(), TokenCategory::Default));
    }

    #[test]
    fn test_closing_delimiter_after_newline_does_not_count() {
        // The closing quote exists, but on the next line: the string span
        // must not cross the newline.
        let text = "\"ab\ncd\"";
        let cats = categories(text);
        assert_eq!(cats[0], ("\"ab".to_string(), TokenCategory::String));
    }

    #[test]
    fn test_single_quoted_string() {
        let cats = categories("'c'");
        assert_eq!(cats, vec![("'c'".to_string(), TokenCategory::String)]);
    }

    #[test]
    fn test_numbers_with_fraction_and_suffix() {
        let cats = categories("12 3.5f 7L 1.");
        assert!(cats.contains(&("12".to_string(), TokenCategory::Number)));
        assert!(cats.contains(&("3.5f".to_string(), TokenCategory::Number)));
        assert!(cats.contains(&("7L".to_string(), TokenCategory::Number)));
        // "1.": the dot is not consumed without fractional digits.
        assert!(cats.contains(&("1".to_string(), TokenCategory::Number)));
        assert!(cats.contains(&(".".to_string(), TokenCategory::Default)));
    }

    #[test]
    fn test_operators_are_single_character() {
        let cats = categories("a==b");
        assert_eq!(
            cats,
            vec![
                ("a".to_string(), TokenCategory::Default),
                ("=".to_string(), TokenCategory::Operator),
                ("=".to_string(), TokenCategory::Operator),
                ("b".to_string(), TokenCategory::Default),
            ]
        );
    }

    #[test]
    fn test_identifier_with_keyword_prefix_is_not_keyword() {
        let cats = categories("iffy");
        assert_eq!(cats, vec![("iffy".to_string(), TokenCategory::Default)]);
    }

    #[test]
    fn test_underscore_starts_identifier() {
        let cats = categories("_x1");
        assert_eq!(cats, vec![("_x1".to_string(), TokenCategory::Default)]);
    }

    #[test]
    fn test_no_line_comment_rule_leaves_slashes_as_operators() {
        let mut no_comment = rule();
        no_comment.line_comment = None;
        let spans = tokenize("// x", &no_comment);
        assert_eq!(spans[0].category, TokenCategory::Operator);
        assert_eq!(spans[1].category, TokenCategory::Operator);
    }

    #[test]
    fn test_multibyte_characters_stay_single_default_spans() {
        let text = "αβ=1";
        let spans = tokenize(text, &rule());
        assert_tiles(text, &spans);
        assert_eq!(spans[0].category, TokenCategory::Default);
        assert_eq!(spans[0].end - spans[0].start, 'α'.len_utf8());
    }

    #[test]
    fn test_empty_text_yields_no_spans() {
        assert!(tokenize("", &rule()).is_empty());
    }

    proptest! {
        #[test]
        fn prop_spans_tile_input(text in "\\PC*") {
            let spans = tokenize(&text, &rule());
            assert_tiles(&text, &spans);
        }

        #[test]
        fn prop_spans_tile_code_like_input(
            text in "[ \\t\\nA-Za-z0-9_+*/=<>!\"'.:;(){}-]*"
        ) {
            let spans = tokenize(&text, &rule());
            assert_tiles(&text, &spans);
        }
    }
}
