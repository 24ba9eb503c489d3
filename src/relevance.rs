use regex::{Regex, RegexBuilder};
use tracing::debug;

pub const EXACT: u8 = 100;
pub const PREFIX: u8 = 90;
pub const WHOLE_WORD: u8 = 80;
pub const SUBSTRING: u8 = 70;
pub const FALLBACK: u8 = 50;

/// Scores titles against one free-text query, ignoring case. The first rung
/// of the ladder that matches wins.
#[derive(Debug, Clone)]
pub struct Scorer {
    query: String,
    whole_word: Option<Regex>,
}

impl Scorer {
    pub fn new(query: &str) -> Self {
        let query = query.to_lowercase();
        // ASCII word boundaries: an accented letter next to the match counts
        // as a separator, the way browser regexes treat it.
        let pattern = format!(r"(?-u:\b){}(?-u:\b)", regex::escape(&query));
        let whole_word = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                debug!("Whole-word pattern for '{}' did not build: {}", query, e);
                None
            }
        };
        Self { query, whole_word }
    }

    pub fn score(&self, title: &str) -> u8 {
        let title = title.to_lowercase();
        let query = self.query.as_str();

        if title == query {
            return EXACT;
        }
        if title.starts_with(query) {
            return PREFIX;
        }
        if self
            .whole_word
            .as_ref()
            .is_some_and(|re| re.is_match(&title))
        {
            return WHOLE_WORD;
        }
        if title.contains(query) {
            return SUBSTRING;
        }
        FALLBACK
    }
}

/// One-off score; build a [`Scorer`] when ranking many titles.
pub fn score(title: &str, query: &str) -> u8 {
    Scorer::new(query).score(title)
}
