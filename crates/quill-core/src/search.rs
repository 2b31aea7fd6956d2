//! Find/replace engine.
//!
//! The find text is always matched verbatim: it is regex-escaped before
//! compilation, then optionally wrapped in word-boundary assertions and
//! compiled case-insensitively. Polarity note: `match_case = true` means
//! case-*sensitive*.
//!
//! The functions here are pure text operations; `EditorSession` wires them
//! to the buffer and its history.

use regex::{Regex, RegexBuilder};

use quill_buffer::Selection;

/// User-configured find/replace state, session-scoped.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub find_text: String,
    pub replace_text: String,
    /// true → case-sensitive matching
    pub match_case: bool,
    /// true → matches must not touch word characters on either side
    pub match_whole_word: bool,
}

impl SearchOptions {
    /// Compiles the verbatim-escaped pattern for the current options.
    ///
    /// Returns `None` for an empty find text; every search and replace
    /// operation is a no-op in that case.
    pub fn pattern(&self) -> Option<Regex> {
        if self.find_text.is_empty() {
            return None;
        }

        let mut source = regex::escape(&self.find_text);
        if self.match_whole_word {
            source = format!(r"\b{source}\b");
        }

        match RegexBuilder::new(&source)
            .case_insensitive(!self.match_case)
            .build()
        {
            Ok(re) => Some(re),
            Err(error) => {
                // Unreachable for escaped input; degrade to a no-op search.
                tracing::warn!(%error, "search pattern failed to compile");
                None
            }
        }
    }

    /// Tests whether `candidate` (the currently selected text) is itself a
    /// complete match for the find target under the current options. This
    /// is the precondition for replace-next.
    pub fn selection_matches(&self, candidate: &str) -> bool {
        if self.find_text.is_empty() {
            return false;
        }

        if self.match_whole_word {
            let Some(re) = self.pattern() else {
                return false;
            };
            re.find(candidate)
                .is_some_and(|m| m.start() == 0 && m.end() == candidate.len())
        } else if self.match_case {
            candidate == self.find_text
        } else {
            candidate.to_lowercase() == self.find_text.to_lowercase()
        }
    }
}

/// Finds the next match at or after `from`, wrapping to the start of the
/// text when nothing matches from there to the end. `None` means the text
/// contains no match at all.
pub fn find_next(text: &str, from: usize, re: &Regex) -> Option<Selection> {
    let from = from.min(text.len());
    re.find_at(text, from)
        .or_else(|| re.find(text))
        .map(|m| Selection::new(m.start(), m.end()))
}

/// Replaces every non-overlapping match left-to-right in one pass. The
/// replacement is inserted literally (no capture-group expansion).
pub fn replace_all(text: &str, re: &Regex, replacement: &str) -> String {
    re.replace_all(text, regex::NoExpand(replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(find: &str) -> SearchOptions {
        SearchOptions {
            find_text: find.to_string(),
            ..SearchOptions::default()
        }
    }

    #[test]
    fn test_empty_find_text_has_no_pattern() {
        assert!(options("").pattern().is_none());
    }

    #[test]
    fn test_find_text_is_matched_verbatim() {
        let re = options("a.c").pattern().unwrap();
        assert!(re.is_match("xa.cx"));
        assert!(!re.is_match("abc"));
    }

    #[test]
    fn test_case_polarity() {
        let mut opts = options("Foo");
        let insensitive = opts.pattern().unwrap();
        assert!(insensitive.is_match("foo"));

        opts.match_case = true;
        let sensitive = opts.pattern().unwrap();
        assert!(!sensitive.is_match("foo"));
        assert!(sensitive.is_match("Foo"));
    }

    #[test]
    fn test_whole_word_boundaries() {
        let mut opts = options("cat");
        opts.match_whole_word = true;
        let re = opts.pattern().unwrap();

        assert!(re.is_match("a cat sat"));
        assert!(!re.is_match("concatenate"));
    }

    #[test]
    fn test_whole_word_and_case_insensitive_combine() {
        let mut opts = options("CAT");
        opts.match_whole_word = true;
        let re = opts.pattern().unwrap();

        assert!(re.is_match("the cat."));
        assert!(!re.is_match("scatter"));
    }

    #[test]
    fn test_find_next_forward_from_offset() {
        let re = options("ab").pattern().unwrap();
        let sel = find_next("abxab", 1, &re).unwrap();
        assert_eq!(sel, Selection::new(3, 5));
    }

    #[test]
    fn test_find_next_wraps_around() {
        let re = options("abc").pattern().unwrap();
        let sel = find_next("abcabc", 6, &re).unwrap();
        assert_eq!(sel, Selection::new(0, 3));
    }

    #[test]
    fn test_find_next_none_when_absent() {
        let re = options("zzz").pattern().unwrap();
        assert!(find_next("abcabc", 0, &re).is_none());
    }

    #[test]
    fn test_selection_matches_exact_and_insensitive() {
        let mut opts = options("word");
        assert!(opts.selection_matches("WORD"));

        opts.match_case = true;
        assert!(!opts.selection_matches("WORD"));
        assert!(opts.selection_matches("word"));
    }

    #[test]
    fn test_selection_matches_whole_word_rejects_partial() {
        let mut opts = options("cat");
        opts.match_whole_word = true;
        assert!(opts.selection_matches("cat"));
        // The selected text embeds the target in a longer word.
        assert!(!opts.selection_matches("cats"));
    }

    #[test]
    fn test_replace_all_is_literal() {
        let re = options("a").pattern().unwrap();
        // "$0" must not be expanded as a capture reference.
        assert_eq!(replace_all("aa", &re, "$0!"), "$0!$0!");
    }

    #[test]
    fn test_replace_all_non_overlapping_left_to_right() {
        let re = options("aa").pattern().unwrap();
        assert_eq!(replace_all("aaaa", &re, "b"), "bb");
        assert_eq!(replace_all("aaa", &re, "b"), "ba");
    }
}
