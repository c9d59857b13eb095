use crate::nlp::types::{DayOfWeek, IntervalUnit, MonthName, RecurrenceDescriptor};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// ============================================================================
// RULE TABLE
// ============================================================================

const DAY: &str = r"(?:monday|mon|tuesday|tue|wednesday|wed|thursday|thu|friday|fri|saturday|sat|sunday|sun)\b";
const MONTH: &str = r"(?:january|jan|february|feb|march|mar|april|apr|may|june|jun|july|jul|august|aug|september|sep|october|oct|november|nov|december|dec)\b";
const LIST_SEP: &str = r"(?:\s*,\s*(?:and\s+)?|\s+and\s+|\s+)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    DayOfEveryMonth,
    Daily,
    DailyAtTime,
    Weekly,
    Monthly,
    Yearly,
    BiMonthly,
    BiWeekly,
    EveryN,
    EveryOther,
    DaysOfTheWeek,
    DayOfTheMonth,
}

struct Rule {
    kind: RuleKind,
    pattern: Regex,
}

/// Order is significant: the first rule that matches and extracts wins.
/// "bi-weekly" is caught by `Weekly` (it contains "weekly") and a bare
/// "every month" by `Monthly`, so those halves of the later rules never fire.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let table = [
        (
            RuleKind::DayOfEveryMonth,
            r"(?i)(\d+)(?:th|st|nd|rd)? of every month".to_string(),
        ),
        (RuleKind::Daily, r"(?i)(every day|daily|everyday)".to_string()),
        (
            RuleKind::DailyAtTime,
            r"(?i)every (morning|noon|afternoon|evening|night)".to_string(),
        ),
        (RuleKind::Weekly, r"(?i)(every week|weekly)".to_string()),
        (RuleKind::Monthly, r"(?i)(every month|monthly)".to_string()),
        (RuleKind::Yearly, r"(?i)every year".to_string()),
        (RuleKind::BiMonthly, r"(?i)every (?:other )?month".to_string()),
        (
            RuleKind::BiWeekly,
            r"(?i)(bi-?weekly|every other week)".to_string(),
        ),
        (
            RuleKind::EveryN,
            r"(?i)every (\d+) (hours?|days?|weeks?|months?|years?)".to_string(),
        ),
        (
            RuleKind::EveryOther,
            r"(?i)every other (hours?|days?|weeks?|months?|years?)".to_string(),
        ),
        (
            RuleKind::DaysOfTheWeek,
            format!(r"(?i)\bevery\s+({day}(?:{sep}{day})*)", day = DAY, sep = LIST_SEP),
        ),
        (
            RuleKind::DayOfTheMonth,
            format!(
                r"(?i)\b(\d+)(?:st|nd|rd|th)? of ({month}(?:{sep}{month})*)",
                month = MONTH,
                sep = LIST_SEP
            ),
        ),
    ];

    table
        .into_iter()
        .map(|(kind, source)| Rule {
            kind,
            pattern: Regex::new(&source).unwrap(),
        })
        .collect()
});

// ============================================================================
// MATCHING
// ============================================================================

/// A recognized recurrence phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrenceMatch {
    pub descriptor: RecurrenceDescriptor,
    /// Human readable rule name, e.g. "Every 3 days".
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Runs the rule cascade over `text`. A rule whose pattern matches but whose
/// captures do not yield a valid descriptor counts as a non-match.
pub fn match_recurrence(text: &str) -> Option<RecurrenceMatch> {
    RULES.iter().find_map(|rule| {
        let caps = rule.pattern.captures(text)?;
        let whole = caps.get(0)?;
        let (descriptor, label) = rule.kind.extract(&caps)?;
        tracing::debug!(rule = ?rule.kind, phrase = whole.as_str(), "recurrence rule matched");
        Some(RecurrenceMatch {
            descriptor,
            label,
            start: whole.start(),
            end: whole.end(),
        })
    })
}

impl RuleKind {
    fn extract(self, caps: &Captures<'_>) -> Option<(RecurrenceDescriptor, String)> {
        match self {
            RuleKind::DayOfEveryMonth => {
                let day = positive(caps.get(1)?.as_str())?;
                let rec = RecurrenceDescriptor::day_of_the_month(day, MonthName::ALL.to_vec())?;
                Some((rec, format!("Every {} of every month", day)))
            }
            RuleKind::Daily => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Days, 1),
                "Every day".to_string(),
            )),
            RuleKind::DailyAtTime => {
                // The time of day only feeds the label; no clock time is set.
                let time = caps.get(1)?.as_str().to_lowercase();
                Some((
                    RecurrenceDescriptor::interval(IntervalUnit::Days, 1),
                    format!("Every {} daily", time),
                ))
            }
            RuleKind::Weekly => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Weeks, 1),
                "Every week".to_string(),
            )),
            RuleKind::Monthly => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Months, 1),
                "Every month".to_string(),
            )),
            RuleKind::Yearly => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Years, 1),
                "Every year".to_string(),
            )),
            RuleKind::BiMonthly => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Months, 2),
                "Bi Monthly".to_string(),
            )),
            RuleKind::BiWeekly => Some((
                RecurrenceDescriptor::interval(IntervalUnit::Weeks, 2),
                "Bi Weekly".to_string(),
            )),
            RuleKind::EveryN => {
                let frequency = positive(caps.get(1)?.as_str())?;
                let word = caps.get(2)?.as_str().to_lowercase();
                let unit = IntervalUnit::from_word(&word)?;
                Some((
                    RecurrenceDescriptor::interval(unit, frequency),
                    format!("Every {} {}", frequency, word),
                ))
            }
            RuleKind::EveryOther => {
                let word = caps.get(1)?.as_str().to_lowercase();
                let unit = IntervalUnit::from_word(&word)?;
                Some((
                    RecurrenceDescriptor::interval(unit, 2),
                    format!("Every other {}", word),
                ))
            }
            RuleKind::DaysOfTheWeek => {
                let days = collect_unique(caps.get(1)?.as_str(), DayOfWeek::from_token);
                let names = days.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ");
                let rec = RecurrenceDescriptor::days_of_the_week(days)?;
                Some((rec, format!("Every {}", names)))
            }
            RuleKind::DayOfTheMonth => {
                let day = positive(caps.get(1)?.as_str())?;
                let months = collect_unique(caps.get(2)?.as_str(), MonthName::from_token);
                let names = months.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ");
                let rec = RecurrenceDescriptor::day_of_the_month(day, months)?;
                Some((rec, format!("Every {} days of {}", day, names)))
            }
        }
    }
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Splits a day/month list on anything that is not a letter and keeps the
/// first occurrence of each recognized name.
fn collect_unique<T: PartialEq>(list: &str, resolve: fn(&str) -> Option<T>) -> Vec<T> {
    let mut out = Vec::new();
    for word in list.split(|c: char| !c.is_alphabetic()) {
        if let Some(item) = resolve(word) {
            if !out.contains(&item) {
                out.push(item);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::types::FrequencyType;

    fn interval_of(text: &str) -> (IntervalUnit, u32, String) {
        let m = match_recurrence(text).expect("recurrence");
        assert_eq!(m.descriptor.frequency_type, FrequencyType::Interval);
        (m.descriptor.metadata.unit.unwrap(), m.descriptor.frequency, m.label)
    }

    #[test]
    fn every_n_units() {
        let m = match_recurrence("Clean gutters every 3 days").unwrap();
        assert_eq!(m.descriptor, RecurrenceDescriptor::interval(IntervalUnit::Days, 3));
        assert_eq!(m.label, "Every 3 days");
        assert_eq!((m.start, m.end), (14, 26));
    }

    #[test]
    fn every_n_hours() {
        assert_eq!(interval_of("stretch every 2 hours").0, IntervalUnit::Hours);
    }

    #[test]
    fn daily_variants() {
        for text in ["water plants every day", "water plants daily", "Everyday stretch"] {
            let (unit, freq, label) = interval_of(text);
            assert_eq!((unit, freq), (IntervalUnit::Days, 1));
            assert_eq!(label, "Every day");
        }
    }

    #[test]
    fn time_of_day_only_affects_label() {
        let (unit, freq, label) = interval_of("walk the dog every Evening");
        assert_eq!((unit, freq), (IntervalUnit::Days, 1));
        assert_eq!(label, "Every evening daily");
    }

    #[test]
    fn weekly_monthly_yearly() {
        assert_eq!(interval_of("review budget weekly").0, IntervalUnit::Weeks);
        assert_eq!(interval_of("pay rent every month").0, IntervalUnit::Months);
        assert_eq!(interval_of("renew passport every year").0, IntervalUnit::Years);
    }

    #[test]
    fn every_other_month_is_bi_monthly() {
        let (unit, freq, label) = interval_of("change filter every other month");
        assert_eq!((unit, freq), (IntervalUnit::Months, 2));
        assert_eq!(label, "Bi Monthly");
    }

    #[test]
    fn bare_every_month_is_taken_by_monthly() {
        let (_, freq, label) = interval_of("every month");
        assert_eq!(freq, 1);
        assert_eq!(label, "Every month");
    }

    #[test]
    fn every_other_week_is_bi_weekly() {
        let (unit, freq, _) = interval_of("mow lawn every other week");
        assert_eq!((unit, freq), (IntervalUnit::Weeks, 2));
    }

    #[test]
    fn bi_weekly_is_shadowed_by_weekly() {
        let m = match_recurrence("team sync bi-weekly").unwrap();
        assert_eq!(m.descriptor, RecurrenceDescriptor::interval(IntervalUnit::Weeks, 1));
        // only the "weekly" part is claimed
        assert_eq!((m.start, m.end), (13, 19));
    }

    #[test]
    fn every_other_unit() {
        let (unit, freq, label) = interval_of("vacuum every other day");
        assert_eq!((unit, freq), (IntervalUnit::Days, 2));
        assert_eq!(label, "Every other day");
    }

    #[test]
    fn days_of_the_week_are_normalized_and_deduplicated() {
        let m = match_recurrence("trash every mon, Thursday and mon").unwrap();
        assert_eq!(m.descriptor.frequency_type, FrequencyType::DaysOfTheWeek);
        assert_eq!(
            m.descriptor.metadata.days,
            vec![DayOfWeek::Monday, DayOfWeek::Thursday]
        );
        assert_eq!(m.label, "Every Monday, Thursday");
        assert_eq!(&"trash every mon, Thursday and mon"[m.start..m.end], "every mon, Thursday and mon");
    }

    #[test]
    fn day_list_stops_at_first_non_day_word() {
        let text = "every friday and buy milk";
        let m = match_recurrence(text).unwrap();
        assert_eq!(&text[m.start..m.end], "every friday");
    }

    #[test]
    fn unknown_day_words_fall_through() {
        let text = "every 3rd of may at 6pm";
        let m = match_recurrence(text).unwrap();
        assert_eq!(m.descriptor.frequency_type, FrequencyType::DayOfTheMonth);
        assert_eq!(m.descriptor.frequency, 3);
        assert_eq!(m.descriptor.metadata.months, vec![MonthName::May]);
        assert_eq!(m.descriptor.metadata.unit, Some(IntervalUnit::Days));
        assert_eq!(&text[m.start..m.end], "3rd of may");
        assert_eq!(m.label, "Every 3 days of May");
    }

    #[test]
    fn day_of_the_month_with_month_list() {
        let m = match_recurrence("service car 1st of jan, july and Dec").unwrap();
        assert_eq!(
            m.descriptor.metadata.months,
            vec![MonthName::January, MonthName::July, MonthName::December]
        );
    }

    #[test]
    fn day_of_every_month() {
        let m = match_recurrence("pay card 15th of every month").unwrap();
        assert_eq!(m.descriptor.frequency_type, FrequencyType::DayOfTheMonth);
        assert_eq!(m.descriptor.frequency, 15);
        assert_eq!(m.descriptor.metadata.months.len(), 12);
    }

    #[test]
    fn zero_interval_is_not_a_recurrence() {
        assert!(match_recurrence("every 0 days").is_none());
    }

    #[test]
    fn plain_text_has_no_recurrence() {
        assert!(match_recurrence("buy milk tomorrow").is_none());
        assert!(match_recurrence("").is_none());
    }
}
