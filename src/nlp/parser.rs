use crate::config::ParserConfig;
use crate::nlp::highlight::{self, Highlight, HighlightKind};
use crate::nlp::recognizer::{DateMatch, DateRecognizer, RecognizerOptions};
use crate::nlp::regex_patterns::{self, DATE_CONNECTOR};
use crate::nlp::rules;
use crate::nlp::types::{Label, ParseResult, Priority};
use chrono::{DateTime, Utc};

/// Decomposes a task sentence into priority, labels, recurrence and due date.
///
/// Every stage searches a *working* copy of the sentence in which the tokens
/// claimed by earlier stages are blanked out with spaces. Blanking keeps byte
/// offsets identical to the original, so every span recorded along the way
/// indexes the original sentence directly.
#[derive(Debug, Clone, Default)]
pub struct SentenceParser {
    config: ParserConfig,
}

/// Intermediate state of one parse, kept separate from the public result so
/// the blanked working text can be compared with the highlight-derived title.
#[derive(Debug)]
pub(crate) struct Extraction {
    pub(crate) working: String,
    pub(crate) result: ParseResult,
}

impl SentenceParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn parse<R>(
        &self,
        sentence: &str,
        labels: &[Label],
        now: DateTime<Utc>,
        recognizer: &R,
    ) -> ParseResult
    where
        R: DateRecognizer + ?Sized,
    {
        self.extract(sentence, labels, now, recognizer).result
    }

    pub(crate) fn extract<R>(
        &self,
        sentence: &str,
        labels: &[Label],
        now: DateTime<Utc>,
        recognizer: &R,
    ) -> Extraction
    where
        R: DateRecognizer + ?Sized,
    {
        if sentence.trim().is_empty() {
            return Extraction {
                working: sentence.to_string(),
                result: ParseResult::unmatched(sentence),
            };
        }

        let mut working = sentence.to_string();
        let mut spans = Vec::new();

        // 1. Priority
        let priority = match regex_patterns::extract_priority(&working) {
            Some((priority, ranges)) => {
                for (start, end) in ranges {
                    blank(&mut working, start, end);
                    spans.push(Highlight::new(start, end, HighlightKind::Priority));
                }
                priority
            }
            None => Priority::None,
        };
        tracing::debug!(level = priority.level(), "priority stage done");

        // 2. Labels, in label-set order
        let mut matched_labels = Vec::new();
        for label in labels {
            if let Some((start, end)) = regex_patterns::find_label(&working, label) {
                blank(&mut working, start, end);
                spans.push(Highlight::new(start, end, HighlightKind::Label));
                matched_labels.push(label.clone());
            }
        }
        tracing::debug!(count = matched_labels.len(), "label stage done");

        // 3. Recurrence
        let recurrence = rules::match_recurrence(&working);
        if let Some(m) = &recurrence {
            blank(&mut working, m.start, m.end);
            spans.push(Highlight::new(m.start, m.end, HighlightKind::Recurrence));
        }

        // 4. Due date. Recurrence blanking can remove words the recognizer
        // needs ("3rd of may at 6pm"), so a second pass runs on the original
        // sentence and its result is preferred.
        let options = RecognizerOptions {
            forward_date: self.config.forward_date,
        };
        let mut due = first_match(recognizer, &working, now, options);
        if recurrence.is_some() {
            if let Some(second) = first_match(recognizer, sentence, now, options) {
                due = Some(second);
            }
        }
        let due_date = due.as_ref().map(|m| m.resolved);
        if let Some(found) = due.as_ref().and_then(|m| date_region(sentence, m)) {
            let (start, end) = found;
            blank(&mut working, start, end);
            spans.push(Highlight::new(start, end, HighlightKind::DueDate));
        }
        tracing::debug!(due = ?due_date, "due date stage done");

        // 5. Highlights and title
        let highlights = highlight::reconcile(spans);
        let cleaned_title = if highlights.is_empty() {
            sentence.to_string()
        } else {
            highlight::strip_highlights(sentence, &highlights)
        };

        let (recurrence, recurrence_label) = match recurrence {
            Some(m) => (Some(m.descriptor), Some(m.label)),
            None => (None, None),
        };

        Extraction {
            working,
            result: ParseResult {
                priority,
                labels: matched_labels,
                recurrence,
                recurrence_label,
                due_date,
                cleaned_title,
                highlights,
            },
        }
    }
}

fn first_match<R>(
    recognizer: &R,
    text: &str,
    now: DateTime<Utc>,
    options: RecognizerOptions,
) -> Option<DateMatch>
where
    R: DateRecognizer + ?Sized,
{
    recognizer.recognize(text, now, options).into_iter().next()
}

/// Region removed for a date match, widened to an immediately preceding
/// connector word ("starting", "from", ...). `None` if the recognizer
/// reported a span that does not fit the sentence.
fn date_region(sentence: &str, found: &DateMatch) -> Option<(usize, usize)> {
    let end = found.end();
    if end > sentence.len()
        || !sentence.is_char_boundary(found.start)
        || !sentence.is_char_boundary(end)
    {
        tracing::warn!(start = found.start, end, "recognizer span outside sentence");
        return None;
    }

    let before = sentence[..found.start].trim_end();
    let start = DATE_CONNECTOR
        .find(before)
        .map(|m| m.start())
        .unwrap_or(found.start);
    Some((start, end))
}

/// Replaces `[start, end)` with spaces, keeping the byte length.
fn blank(text: &mut String, start: usize, end: usize) {
    let fill = " ".repeat(end - start);
    text.replace_range(start..end, &fill);
}
