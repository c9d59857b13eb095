use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationUnit {
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "h")]
    Hours,
    #[serde(rename = "d")]
    Days,
}

impl NotificationUnit {
    pub fn minutes(self) -> i64 {
        match self {
            NotificationUnit::Minutes => 1,
            NotificationUnit::Hours => 60,
            NotificationUnit::Days => 24 * 60,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            NotificationUnit::Minutes => 'm',
            NotificationUnit::Hours => 'h',
            NotificationUnit::Days => 'd',
        }
    }

    fn plural(self) -> &'static str {
        match self {
            NotificationUnit::Minutes => "minutes",
            NotificationUnit::Hours => "hours",
            NotificationUnit::Days => "days",
        }
    }
}

/// Where a notification sits relative to the due date, as the user sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Before,
    OnDue,
    After,
}

/// A notification relative to a due date: negative before, zero on, positive after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationOffset {
    pub value: i64,
    pub unit: NotificationUnit,
}

/// The three-way form an offset is edited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOffset {
    pub timing: Timing,
    pub display_value: i64,
    pub unit: NotificationUnit,
}

impl NotificationOffset {
    pub const fn new(value: i64, unit: NotificationUnit) -> Self {
        Self { value, unit }
    }

    pub const fn on_due() -> Self {
        Self::new(0, NotificationUnit::Minutes)
    }

    pub fn is_on_due(&self) -> bool {
        self.value == 0
    }

    /// Signed offset in minutes.
    pub fn signed_minutes(&self) -> i64 {
        self.value.saturating_mul(self.unit.minutes())
    }

    pub fn to_ui(&self) -> UiOffset {
        let timing = match self.value {
            0 => Timing::OnDue,
            v if v < 0 => Timing::Before,
            _ => Timing::After,
        };
        UiOffset {
            timing,
            display_value: self.value.saturating_abs(),
            unit: self.unit,
        }
    }

    pub fn from_ui(ui: UiOffset) -> Self {
        Self::new(to_internal(ui.timing, ui.display_value), ui.unit)
    }

    /// Absolute time this notification fires for a task due at `due`, or
    /// `None` if that lies outside the representable date range.
    pub fn fire_time(&self, due: DateTime<Utc>) -> Option<DateTime<Utc>> {
        TimeDelta::try_minutes(self.signed_minutes()).and_then(|delta| due.checked_add_signed(delta))
    }

    /// "On due date" or e.g. "3 hours before due".
    pub fn relative_label(&self) -> String {
        if self.is_on_due() {
            return "On due date".to_string();
        }
        let side = if self.value < 0 { "before" } else { "after" };
        format!(
            "{} {} {} due",
            self.value.saturating_abs(),
            self.unit.plural(),
            side
        )
    }
}

/// Signed internal value for a UI timing and magnitude. `OnDue` discards the
/// magnitude.
pub fn to_internal(timing: Timing, display_value: i64) -> i64 {
    match timing {
        Timing::OnDue => 0,
        Timing::Before => -display_value.saturating_abs(),
        Timing::After => display_value.saturating_abs(),
    }
}

impl fmt::Display for NotificationOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value > 0 {
            write!(f, "+{}{}", self.value, self.unit.symbol())
        } else {
            write!(f, "{}{}", self.value, self.unit.symbol())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetParseError(String);

impl fmt::Display for OffsetParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid notification offset '{}': expected e.g. -1d, 30m, +3h",
            self.0
        )
    }
}

impl std::error::Error for OffsetParseError {}

impl FromStr for NotificationOffset {
    type Err = OffsetParseError;

    /// Parses `[+|-]<number><m|h|d>`; a bare `0` is the on-due offset.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == "0" {
            return Ok(Self::on_due());
        }
        let err = || OffsetParseError(s.to_string());

        let unit = match trimmed.chars().last().ok_or_else(err)? {
            'm' | 'M' => NotificationUnit::Minutes,
            'h' | 'H' => NotificationUnit::Hours,
            'd' | 'D' => NotificationUnit::Days,
            _ => return Err(err()),
        };
        let number = &trimmed[..trimmed.len() - 1];
        let number = number.strip_prefix('+').unwrap_or(number);
        let value = number.parse::<i64>().map_err(|_| err())?;
        Ok(Self::new(value, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NotificationUnit::*;

    #[test]
    fn nonzero_offsets_round_trip_through_ui() {
        for value in [-90, -1, 1, 45] {
            for unit in [Minutes, Hours, Days] {
                let offset = NotificationOffset::new(value, unit);
                assert_eq!(NotificationOffset::from_ui(offset.to_ui()), offset);
            }
        }
    }

    #[test]
    fn zero_is_always_on_due() {
        let ui = NotificationOffset::new(0, Hours).to_ui();
        assert_eq!(
            ui,
            UiOffset {
                timing: Timing::OnDue,
                display_value: 0,
                unit: Hours
            }
        );
        assert_eq!(NotificationOffset::from_ui(ui), NotificationOffset::new(0, Hours));
    }

    #[test]
    fn on_due_discards_magnitude() {
        assert_eq!(to_internal(Timing::OnDue, 15), 0);
        assert_eq!(to_internal(Timing::Before, 15), -15);
        assert_eq!(to_internal(Timing::Before, -15), -15);
        assert_eq!(to_internal(Timing::After, -15), 15);
    }

    #[test]
    fn signed_minutes_by_unit() {
        assert_eq!(NotificationOffset::new(-30, Minutes).signed_minutes(), -30);
        assert_eq!(NotificationOffset::new(-2, Hours).signed_minutes(), -120);
        assert_eq!(NotificationOffset::new(3, Days).signed_minutes(), 4320);
        assert_eq!(NotificationOffset::new(0, Days).signed_minutes(), 0);
    }

    #[test]
    fn relative_labels() {
        assert_eq!(NotificationOffset::new(-3, Hours).relative_label(), "3 hours before due");
        assert_eq!(NotificationOffset::new(1, Days).relative_label(), "1 days after due");
        assert_eq!(NotificationOffset::on_due().relative_label(), "On due date");
    }

    #[test]
    fn parse_and_display() {
        let parsed: NotificationOffset = "-1d".parse().unwrap();
        assert_eq!(parsed, NotificationOffset::new(-1, Days));
        assert_eq!("+3h".parse::<NotificationOffset>().unwrap(), NotificationOffset::new(3, Hours));
        assert_eq!("30m".parse::<NotificationOffset>().unwrap().to_string(), "+30m");
        assert_eq!("0".parse::<NotificationOffset>().unwrap(), NotificationOffset::on_due());
        assert!("soon".parse::<NotificationOffset>().is_err());
        assert!("".parse::<NotificationOffset>().is_err());
        assert!("d".parse::<NotificationOffset>().is_err());
    }

    #[test]
    fn serializes_like_the_template_blob() {
        let json = serde_json::to_string(&NotificationOffset::new(-30, Minutes)).unwrap();
        assert_eq!(json, r#"{"value":-30,"unit":"m"}"#);
    }

    #[test]
    fn fire_time_adds_signed_offset() {
        use chrono::TimeZone;
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        assert_eq!(
            NotificationOffset::new(-1, Days).fire_time(due),
            Some(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn fire_time_out_of_range_is_none() {
        use chrono::TimeZone;
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        assert_eq!(NotificationOffset::new(999_999_999, Days).fire_time(due), None);
        assert_eq!(NotificationOffset::new(i64::MIN, Minutes).fire_time(due), None);
    }
}
