use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_english::{Dialect, parse_date_string};
use serde::{Deserialize, Serialize};

/// Longest run of words tried as a single date phrase.
const MAX_PHRASE_WORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerOptions {
    /// Resolve ambiguous phrases to the future rather than the past.
    pub forward_date: bool,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self { forward_date: true }
    }
}

/// A date/time phrase found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    pub text: String,
    /// Byte offset of `text` in the searched string.
    pub start: usize,
    pub resolved: DateTime<Utc>,
}

impl DateMatch {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Finds date phrases in free text, ordered by position.
pub trait DateRecognizer {
    fn recognize(
        &self,
        text: &str,
        reference: DateTime<Utc>,
        options: RecognizerOptions,
    ) -> Vec<DateMatch>;
}

impl<F> DateRecognizer for F
where
    F: Fn(&str, DateTime<Utc>, RecognizerOptions) -> Vec<DateMatch>,
{
    fn recognize(
        &self,
        text: &str,
        reference: DateTime<Utc>,
        options: RecognizerOptions,
    ) -> Vec<DateMatch> {
        self(text, reference, options)
    }
}

/// Recognizer that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDates;

impl DateRecognizer for NoDates {
    fn recognize(&self, _: &str, _: DateTime<Utc>, _: RecognizerOptions) -> Vec<DateMatch> {
        Vec::new()
    }
}

/// English recognizer backed by `chrono-english`. Word windows are tried
/// longest first from each word; accepted windows never overlap.
/// Defaults to US month/day ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishDateRecognizer {
    day_first: bool,
}

impl EnglishDateRecognizer {
    /// UK ordering: "3/5" is the 3rd of May.
    pub fn day_first() -> Self {
        Self { day_first: true }
    }

    fn dialect(&self) -> Dialect {
        if self.day_first { Dialect::Uk } else { Dialect::Us }
    }

    /// Date for one candidate window, or `None` if the window is not a usable
    /// date. Bare numbers are years to `chrono-english` and never count.
    fn resolve(
        &self,
        phrase: &str,
        reference: DateTime<Utc>,
        options: RecognizerOptions,
    ) -> Option<DateTime<Utc>> {
        if is_bare_number(phrase) {
            return None;
        }
        let resolved = parse_date_string(phrase, reference, self.dialect()).ok()?;
        if !options.forward_date {
            return Some(resolved);
        }
        let rolled = roll_forward(resolved, reference);
        if rolled < reference {
            tracing::trace!(phrase, %resolved, "past date dropped");
            return None;
        }
        Some(rolled)
    }
}

impl DateRecognizer for EnglishDateRecognizer {
    fn recognize(
        &self,
        text: &str,
        reference: DateTime<Utc>,
        options: RecognizerOptions,
    ) -> Vec<DateMatch> {
        let words = word_spans(text);
        let mut matches = Vec::new();
        // Words before this index belong to an earlier match
        let mut consumed = 0;
        let mut i = 0;

        while i < words.len() {
            let longest = MAX_PHRASE_WORDS.min(words.len() - i);
            let found = (1..=longest).rev().find_map(|len| {
                let phrase = &text[words[i].0..words[i + len - 1].1];
                self.resolve(phrase, reference, options)
                    .map(|resolved| (len, resolved))
            });

            match found {
                Some((len, resolved)) => {
                    let mut start = words[i].0;
                    if i > consumed && is_preposition(&text[words[i - 1].0..words[i - 1].1]) {
                        start = words[i - 1].0;
                    }
                    let end = words[i + len - 1].1;
                    let phrase = &text[start..end];
                    tracing::trace!(phrase, %resolved, "date phrase recognized");
                    matches.push(DateMatch {
                        text: phrase.to_string(),
                        start,
                        resolved,
                    });
                    i += len;
                    consumed = i;
                }
                None => i += 1,
            }
        }

        matches
    }
}

/// "3", "42," or "(7)": digits with nothing but surrounding punctuation.
fn is_bare_number(phrase: &str) -> bool {
    let core = phrase.trim_matches(|c: char| c.is_ascii_punctuation());
    core.is_empty() || core.chars().all(|c| c.is_ascii_digit())
}

/// Words that read as part of the date that follows them ("at 5pm").
fn is_preposition(word: &str) -> bool {
    ["at", "on", "by"]
        .iter()
        .any(|p| word.eq_ignore_ascii_case(p))
}

/// Byte ranges of the whitespace separated words of `text`.
fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (idx, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, idx));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// Moves a past result into the future: same-day results (time-only phrases)
/// by a day, anything else by a year.
fn roll_forward(resolved: DateTime<Utc>, reference: DateTime<Utc>) -> DateTime<Utc> {
    if resolved >= reference {
        return resolved;
    }
    if resolved.date_naive() == reference.date_naive() {
        return resolved + Duration::days(1);
    }
    resolved
        .with_year(resolved.year() + 1)
        .filter(|next| *next >= reference)
        .unwrap_or(resolved)
}
