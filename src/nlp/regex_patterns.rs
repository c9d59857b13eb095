use crate::nlp::types::{Label, Priority};
use once_cell::sync::Lazy;
use regex::Regex;

/// Phrase lists per priority level, checked in ascending level order.
const PRIORITY_PHRASES: [(Priority, &[&str]); 4] = [
    (
        Priority::P1,
        &[
            "!p1",
            "priority 1",
            "high priority",
            "urgent",
            "asap",
            "important",
        ],
    ),
    (Priority::P2, &["!p2", "priority 2", "medium priority"]),
    (Priority::P3, &["!p3", "priority 3", "low priority"]),
    (Priority::P4, &["!p4", "priority 4"]),
];

// Compile one alternation per level once
static PRIORITY_PATTERNS: Lazy<Vec<(Priority, Regex)>> = Lazy::new(|| {
    PRIORITY_PHRASES
        .iter()
        .map(|(priority, phrases)| {
            let alternation = phrases
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&format!("(?i)(?:{})", alternation))
                .expect("priority phrases are valid regex literals");
            (*priority, re)
        })
        .collect()
});

/// Words that may introduce a date ("starting tomorrow") and are removed with it.
pub static DATE_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:starting|from|beginning|begin|commence|commencing)\s*$").unwrap()
});

/// First priority level with any phrase present, plus the byte range of every
/// occurrence of that level's phrases.
pub fn extract_priority(text: &str) -> Option<(Priority, Vec<(usize, usize)>)> {
    PRIORITY_PATTERNS.iter().find_map(|(priority, re)| {
        let spans: Vec<(usize, usize)> = re.find_iter(text).map(|m| (m.start(), m.end())).collect();
        if spans.is_empty() {
            None
        } else {
            Some((*priority, spans))
        }
    })
}

/// Byte range of the first case-insensitive `#name` occurrence.
pub fn find_label(text: &str, label: &Label) -> Option<(usize, usize)> {
    if label.name.is_empty() {
        return None;
    }
    let re = Regex::new(&format!("(?i)#{}", regex::escape(&label.name))).ok()?;
    re.find(text).map(|m| (m.start(), m.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parsing() {
        let (priority, spans) = extract_priority("Fix bug !p3 today").unwrap();
        assert_eq!(priority, Priority::P3);
        assert_eq!(spans, vec![(8, 11)]);
    }

    #[test]
    fn lower_level_phrase_wins_over_position() {
        let (priority, _) = extract_priority("!p3 call plumber, urgent").unwrap();
        assert_eq!(priority, Priority::P1);
    }

    #[test]
    fn every_occurrence_of_the_level_is_reported() {
        let (priority, spans) = extract_priority("ASAP: pay rent asap").unwrap();
        assert_eq!(priority, Priority::P1);
        assert_eq!(spans, vec![(0, 4), (15, 19)]);
    }

    #[test]
    fn no_phrase_means_no_priority() {
        assert!(extract_priority("water the plants").is_none());
    }

    #[test]
    fn label_match_ignores_case() {
        let label = Label::new(1, "Yard");
        assert_eq!(find_label("rake leaves #yard", &label), Some((12, 17)));
        assert_eq!(find_label("rake leaves", &label), None);
    }

    #[test]
    fn label_names_are_matched_literally() {
        let label = Label::new(2, "c++");
        assert_eq!(find_label("study #C++ book", &label), Some((6, 10)));
        assert_eq!(find_label("study #c book", &label), None);
    }

    #[test]
    fn connector_must_end_the_prefix() {
        assert!(DATE_CONNECTOR.is_match("Gym starting "));
        assert!(DATE_CONNECTOR.is_match("Gym From"));
        assert!(!DATE_CONNECTOR.is_match("Gym frommage "));
        assert!(!DATE_CONNECTOR.is_match("starting gym "));
    }
}
