//! Word counting and word-count bounds.
//!
//! Counting goes through a [`Segmenter`] chosen by locale. Custom segmenters
//! can be registered per locale with [`set_segmenter`]; locales without one
//! use [`DefaultSegmenter`].

use super::{Bound, WithMessage};
use crate::core::config::Config;
use crate::core::dataset::{Dataset, IssueDetails};
use crate::core::issue::Requirement;
use crate::core::unit::{Unit, UnitMetadata};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Splits text into words.
pub trait Segmenter: Send + Sync {
    /// Words of `text` in order.
    fn words<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Number of words in `text`.
    fn count(&self, text: &str) -> usize {
        self.words(text).len()
    }
}

/// Rule-based segmenter.
///
/// A word is a run of alphanumeric characters or `_`. Apostrophes, periods
/// and middle dots between two word characters keep the word together, as
/// do `,` and `;` between digits. Swedish and Finnish also join words with
/// `:`. Everything else separates words; emoji and punctuation alone are
/// not words.
#[derive(Debug, Clone, Default)]
pub struct DefaultSegmenter {
    colon_joins: bool,
}

impl DefaultSegmenter {
    /// Segmenter with the rules for `locale`.
    pub fn for_locale(locale: &str) -> Self {
        Self {
            colon_joins: matches!(primary_subtag(locale).as_str(), "sv" | "fi"),
        }
    }

    fn joins(&self, prev: char, mid: char, next: char) -> bool {
        match mid {
            '\'' | '\u{2019}' | '.' | '\u{00B7}' => true,
            ':' => self.colon_joins,
            ',' | ';' => prev.is_ascii_digit() && next.is_ascii_digit(),
            _ => false,
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn primary_subtag(locale: &str) -> String {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

impl Segmenter for DefaultSegmenter {
    fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut words = Vec::new();
        let mut start: Option<usize> = None;

        for (i, &(pos, ch)) in chars.iter().enumerate() {
            if is_word_char(ch) {
                start.get_or_insert(pos);
                continue;
            }
            let Some(begin) = start else {
                continue;
            };
            let prev = chars[i - 1].1;
            if let Some(&(_, next)) = chars.get(i + 1) {
                if is_word_char(next) && self.joins(prev, ch, next) {
                    continue;
                }
            }
            words.push(&text[begin..pos]);
            start = None;
        }
        if let Some(begin) = start {
            words.push(&text[begin..]);
        }
        words
    }
}

// ============================================================================
// Segmenter Store
// ============================================================================

static SEGMENTERS: Lazy<RwLock<HashMap<String, Arc<dyn Segmenter>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register `segmenter` for `locale`, replacing any previous one.
pub fn set_segmenter(locale: impl Into<String>, segmenter: Arc<dyn Segmenter>) {
    SEGMENTERS.write().insert(locale.into(), segmenter);
}

/// Segmenter for `locale`.
///
/// Looks up the exact tag, then its primary language subtag, and falls
/// back to [`DefaultSegmenter::for_locale`].
pub fn segmenter(locale: &str) -> Arc<dyn Segmenter> {
    let store = SEGMENTERS.read();
    store
        .get(locale)
        .or_else(|| store.get(&primary_subtag(locale)))
        .cloned()
        .unwrap_or_else(|| Arc::new(DefaultSegmenter::for_locale(locale)))
}

/// Number of words in `text` under `locale`.
pub fn word_count(locale: &str, text: &str) -> usize {
    segmenter(locale).count(text)
}

// ============================================================================
// Word-Count Bounds
// ============================================================================

/// Bound on the number of words in a string.
#[derive(Debug, Clone)]
pub struct WordCheck {
    meta: UnitMetadata,
    locale: String,
    bound: Bound,
    limit: usize,
}

impl WordCheck {
    fn new(type_name: &'static str, locale: impl Into<String>, bound: Bound, limit: usize) -> Self {
        Self {
            meta: UnitMetadata::validation(type_name)
                .expects(bound.expects(&limit.to_string()))
                .requirement(Requirement::Length(limit)),
            locale: locale.into(),
            bound,
            limit,
        }
    }

    /// Locale used for counting.
    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl WithMessage for WordCheck {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for WordCheck {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(text) = dataset.value.as_str() {
            let count = word_count(&self.locale, text);
            if !self.bound.holds(count, self.limit) {
                let details = IssueDetails::new().received(count.to_string());
                dataset.raise(&self.meta, "words", config, details);
            }
        }
        dataset
    }
}

/// Exactly `limit` words.
pub fn words(locale: impl Into<String>, limit: usize) -> WordCheck {
    WordCheck::new("words", locale, Bound::Exact, limit)
}

/// At least `limit` words.
pub fn min_words(locale: impl Into<String>, limit: usize) -> WordCheck {
    WordCheck::new("min_words", locale, Bound::Min, limit)
}

/// At most `limit` words.
pub fn max_words(locale: impl Into<String>, limit: usize) -> WordCheck {
    WordCheck::new("max_words", locale, Bound::Max, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("en", ""), 0);
        assert_eq!(word_count("en", "h"), 1);
        assert_eq!(word_count("en", "hello"), 1);
        assert_eq!(word_count("en", "hello world"), 2);
        assert_eq!(word_count("en", "🧑🏻‍💻"), 0);
        assert_eq!(word_count("th", "สวัสดี"), 1);
    }

    #[test]
    fn test_locale_rules() {
        assert_eq!(word_count("en", "foo:bar baz:qux"), 4);
        assert_eq!(word_count("sv", "foo:bar baz:qux"), 2);
        assert_eq!(word_count("fi-FI", "foo:bar baz:qux"), 2);
    }

    #[test]
    fn test_joiners() {
        let segmenter = DefaultSegmenter::for_locale("en");
        assert_eq!(segmenter.words("don't stop"), vec!["don't", "stop"]);
        assert_eq!(segmenter.words("pi is 3.14, not 3,2"), vec!["pi", "is", "3.14", "not", "3,2"]);
        assert_eq!(segmenter.words("end. Next"), vec!["end", "Next"]);
        assert_eq!(segmenter.words("a,b"), vec!["a", "b"]);
        assert_eq!(segmenter.words("--snake_case--"), vec!["snake_case"]);
    }

    #[test]
    fn test_custom_segmenter() {
        struct PerChar;
        impl Segmenter for PerChar {
            fn words<'a>(&self, text: &'a str) -> Vec<&'a str> {
                text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
            }
        }

        set_segmenter("x-per-char", Arc::new(PerChar));
        assert_eq!(word_count("x-per-char", "abc"), 3);
        assert_eq!(word_count("x-per-char-variant", "abc"), 1);
    }

    #[test]
    fn test_word_bounds() {
        let config = Config::new();
        let run = |unit: WordCheck, text: &str| unit.run(Dataset::typed(text), &config);

        assert!(run(words("en", 2), "hello world").issues.is_empty());
        assert!(run(max_words("en", 2), "one").issues.is_empty());

        let dataset = run(min_words("en", 3), "hello world");
        let issue = &dataset.issues[0];
        assert_eq!(issue.type_name, "min_words");
        assert_eq!(issue.expected.as_deref(), Some(">=3"));
        assert_eq!(issue.received, "2");
        assert_eq!(issue.message, "Invalid words: Expected >=3 but received 2");
    }
}
