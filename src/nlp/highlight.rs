use serde::{Deserialize, Serialize};

/// Category of a recognized token range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightKind {
    Recurrence,
    Priority,
    Label,
    DueDate,
}

impl HighlightKind {
    /// Weight used when two spans overlap; the higher one survives.
    pub fn weight(self) -> u8 {
        match self {
            HighlightKind::Recurrence => 40,
            HighlightKind::Priority => 30,
            HighlightKind::Label => 20,
            HighlightKind::DueDate => 10,
        }
    }
}

/// Byte range `[start, end)` into the original sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
    pub kind: HighlightKind,
}

impl Highlight {
    pub fn new(start: usize, end: usize, kind: HighlightKind) -> Self {
        Self { start, end, kind }
    }

    fn overlaps(&self, other: &Highlight) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Sorts spans by start (stable, so ties keep collection order) and folds them
/// into a non-overlapping list. A candidate overlapping the last accepted span
/// replaces it only if its weight is strictly higher; the loser is dropped whole.
pub fn reconcile(mut spans: Vec<Highlight>) -> Vec<Highlight> {
    spans.sort_by_key(|h| h.start);

    spans.into_iter().fold(Vec::new(), |mut accepted, candidate| {
        match accepted.last().copied() {
            Some(last) if last.overlaps(&candidate) => {
                if candidate.kind.weight() > last.kind.weight() {
                    accepted.pop();
                    accepted.push(candidate);
                }
            }
            _ => accepted.push(candidate),
        }
        accepted
    })
}

/// Concatenates the runs of `sentence` outside the (reconciled, sorted)
/// highlights and collapses whitespace.
pub fn strip_highlights(sentence: &str, highlights: &[Highlight]) -> String {
    let mut kept = String::with_capacity(sentence.len());
    let mut cursor = 0;

    for h in highlights {
        if h.start > cursor {
            kept.push_str(&sentence[cursor..h.start]);
        }
        cursor = cursor.max(h.end);
    }
    if cursor < sentence.len() {
        kept.push_str(&sentence[cursor..]);
    }

    collapse_whitespace(&kept)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use HighlightKind::*;

    #[test]
    fn higher_weight_replaces_overlapping_span() {
        let spans = vec![
            Highlight::new(0, 10, DueDate),
            Highlight::new(5, 12, Recurrence),
        ];
        assert_eq!(reconcile(spans), vec![Highlight::new(5, 12, Recurrence)]);
    }

    #[test]
    fn lower_weight_candidate_is_dropped_not_trimmed() {
        let spans = vec![
            Highlight::new(0, 10, Recurrence),
            Highlight::new(8, 20, Label),
        ];
        assert_eq!(reconcile(spans), vec![Highlight::new(0, 10, Recurrence)]);
    }

    #[test]
    fn equal_start_keeps_collection_order() {
        let spans = vec![
            Highlight::new(3, 9, Recurrence),
            Highlight::new(3, 15, DueDate),
        ];
        assert_eq!(reconcile(spans), vec![Highlight::new(3, 9, Recurrence)]);
    }

    #[test]
    fn adjacent_spans_do_not_overlap() {
        let spans = vec![Highlight::new(4, 8, Label), Highlight::new(0, 4, DueDate)];
        assert_eq!(
            reconcile(spans),
            vec![Highlight::new(0, 4, DueDate), Highlight::new(4, 8, Label)]
        );
    }

    #[test]
    fn strip_keeps_unhighlighted_runs() {
        let sentence = "Clean gutters every 3 days !p2";
        let spans = vec![
            Highlight::new(14, 26, Recurrence),
            Highlight::new(27, 30, Priority),
        ];
        assert_eq!(strip_highlights(sentence, &spans), "Clean gutters");
    }

    #[test]
    fn strip_collapses_whitespace_left_behind() {
        let sentence = "  water   #garden plants ";
        let spans = vec![Highlight::new(10, 17, Label)];
        assert_eq!(strip_highlights(sentence, &spans), "water plants");
    }
}
