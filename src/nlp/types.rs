use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nlp::highlight::Highlight;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub priority: Priority,
    pub labels: Vec<Label>,
    pub recurrence: Option<RecurrenceDescriptor>,
    /// Human readable form of the recurrence, e.g. "Every 3 days".
    pub recurrence_label: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub cleaned_title: String,
    pub highlights: Vec<Highlight>,
}

impl ParseResult {
    /// The result for a sentence nothing was recognized in.
    pub fn unmatched(sentence: &str) -> Self {
        Self {
            priority: Priority::None,
            labels: Vec::new(),
            recurrence: None,
            recurrence_label: None,
            due_date: None,
            cleaned_title: sentence.to_string(),
            highlights: Vec::new(),
        }
    }
}

/// Task priority, serialized as its numeric level (0 = none, 1 = highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Priority {
    #[default]
    None,
    P1,
    P2,
    P3,
    P4,
}

impl Priority {
    pub fn level(self) -> u8 {
        match self {
            Priority::None => 0,
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
            Priority::P4 => 4,
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> u8 {
        p.level()
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Priority::None),
            1 => Ok(Priority::P1),
            2 => Ok(Priority::P2),
            3 => Ok(Priority::P3),
            4 => Ok(Priority::P4),
            other => Err(format!("priority level out of range: {}", other)),
        }
    }
}

/// A user-defined label, matched in text as `#name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: i64,
    pub name: String,
}

impl Label {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyType {
    Interval,
    DaysOfTheWeek,
    DayOfTheMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl IntervalUnit {
    /// Accepts singular or plural unit words ("day", "Weeks", ...).
    pub fn from_word(word: &str) -> Option<Self> {
        let lower = word.to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "hour" => Some(IntervalUnit::Hours),
            "day" => Some(IntervalUnit::Days),
            "week" => Some(IntervalUnit::Weeks),
            "month" => Some(IntervalUnit::Months),
            "year" => Some(IntervalUnit::Years),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntervalUnit::Hours => "hours",
            IntervalUnit::Days => "days",
            IntervalUnit::Weeks => "weeks",
            IntervalUnit::Months => "months",
            IntervalUnit::Years => "years",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Full name or three-letter abbreviation, any case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Some(DayOfWeek::Monday),
            "tuesday" | "tue" => Some(DayOfWeek::Tuesday),
            "wednesday" | "wed" => Some(DayOfWeek::Wednesday),
            "thursday" | "thu" => Some(DayOfWeek::Thursday),
            "friday" | "fri" => Some(DayOfWeek::Friday),
            "saturday" | "sat" => Some(DayOfWeek::Saturday),
            "sunday" | "sun" => Some(DayOfWeek::Sunday),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    pub const ALL: [MonthName; 12] = [
        MonthName::January,
        MonthName::February,
        MonthName::March,
        MonthName::April,
        MonthName::May,
        MonthName::June,
        MonthName::July,
        MonthName::August,
        MonthName::September,
        MonthName::October,
        MonthName::November,
        MonthName::December,
    ];

    /// Full name or three-letter abbreviation, any case.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "january" | "jan" => Some(MonthName::January),
            "february" | "feb" => Some(MonthName::February),
            "march" | "mar" => Some(MonthName::March),
            "april" | "apr" => Some(MonthName::April),
            "may" => Some(MonthName::May),
            "june" | "jun" => Some(MonthName::June),
            "july" | "jul" => Some(MonthName::July),
            "august" | "aug" => Some(MonthName::August),
            "september" | "sep" => Some(MonthName::September),
            "october" | "oct" => Some(MonthName::October),
            "november" | "nov" => Some(MonthName::November),
            "december" | "dec" => Some(MonthName::December),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MonthName::January => "January",
            MonthName::February => "February",
            MonthName::March => "March",
            MonthName::April => "April",
            MonthName::May => "May",
            MonthName::June => "June",
            MonthName::July => "July",
            MonthName::August => "August",
            MonthName::September => "September",
            MonthName::October => "October",
            MonthName::November => "November",
            MonthName::December => "December",
        }
    }
}

/// Shape shared by all frequency types; only the fields relevant to
/// `frequency_type` are populated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrequencyMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<IntervalUnit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DayOfWeek>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub months: Vec<MonthName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceDescriptor {
    pub frequency_type: FrequencyType,
    pub frequency: u32,
    pub metadata: FrequencyMetadata,
}

impl RecurrenceDescriptor {
    pub fn interval(unit: IntervalUnit, frequency: u32) -> Self {
        Self {
            frequency_type: FrequencyType::Interval,
            frequency: frequency.max(1),
            metadata: FrequencyMetadata {
                unit: Some(unit),
                ..Default::default()
            },
        }
    }

    /// `None` when `days` is empty.
    pub fn days_of_the_week(days: Vec<DayOfWeek>) -> Option<Self> {
        if days.is_empty() {
            return None;
        }
        Some(Self {
            frequency_type: FrequencyType::DaysOfTheWeek,
            frequency: 1,
            metadata: FrequencyMetadata {
                days,
                ..Default::default()
            },
        })
    }

    /// `None` when `months` is empty. `day` is the day of the month.
    pub fn day_of_the_month(day: u32, months: Vec<MonthName>) -> Option<Self> {
        if months.is_empty() {
            return None;
        }
        Some(Self {
            frequency_type: FrequencyType::DayOfTheMonth,
            frequency: day.max(1),
            metadata: FrequencyMetadata {
                unit: Some(IntervalUnit::Days),
                months,
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_serializes_as_level() {
        let json = serde_json::to_string(&Priority::P2).unwrap();
        assert_eq!(json, "2");
        let back: Priority = serde_json::from_str("4").unwrap();
        assert_eq!(back, Priority::P4);
        assert!(serde_json::from_str::<Priority>("9").is_err());
    }

    #[test]
    fn unit_words_accept_singular_and_plural() {
        assert_eq!(IntervalUnit::from_word("Day"), Some(IntervalUnit::Days));
        assert_eq!(IntervalUnit::from_word("weeks"), Some(IntervalUnit::Weeks));
        assert_eq!(IntervalUnit::from_word("fortnight"), None);
    }

    #[test]
    fn interval_metadata_serializes_unit_only() {
        let rec = RecurrenceDescriptor::interval(IntervalUnit::Days, 3);
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["frequencyType"], "interval");
        assert_eq!(value["frequency"], 3);
        assert_eq!(value["metadata"], serde_json::json!({ "unit": "days" }));
    }

    #[test]
    fn empty_day_and_month_sets_are_rejected() {
        assert!(RecurrenceDescriptor::days_of_the_week(vec![]).is_none());
        assert!(RecurrenceDescriptor::day_of_the_month(3, vec![]).is_none());
    }
}
