use crate::notify::offset::{NotificationOffset, NotificationUnit};
use crate::notify::template::NotificationTemplate;
use chrono::{DateTime, Utc};
use serde::Serialize;

const MAX_NAME_CHARS: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reminder,
    Due,
    Overdue,
}

impl NotificationKind {
    pub fn of(offset: &NotificationOffset) -> Self {
        match offset.value {
            v if v < 0 => NotificationKind::Reminder,
            0 => NotificationKind::Due,
            _ => NotificationKind::Overdue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedNotification {
    pub offset: NotificationOffset,
    pub fire_at: DateTime<Utc>,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
}

/// Notifications of `template` for a task due at `due` that still lie ahead
/// of `now`, in template order.
pub fn plan(
    task_name: &str,
    due: DateTime<Utc>,
    now: DateTime<Utc>,
    template: &NotificationTemplate,
) -> Vec<PlannedNotification> {
    template
        .offsets()
        .iter()
        .filter_map(|offset| {
            let Some(fire_at) = offset.fire_time(due) else {
                tracing::debug!(%offset, %due, "skipping notification outside the date range");
                return None;
            };
            if fire_at <= now {
                tracing::debug!(%offset, %fire_at, "skipping notification in the past");
                return None;
            }
            let (title, body) = notification_text(task_name, offset);
            Some(PlannedNotification {
                offset: *offset,
                fire_at,
                kind: NotificationKind::of(offset),
                title,
                body,
            })
        })
        .collect()
}

/// Title and body shown for `offset` of the task named `task_name`.
pub fn notification_text(task_name: &str, offset: &NotificationOffset) -> (String, String) {
    let name = truncate_name(task_name);
    match NotificationKind::of(offset) {
        NotificationKind::Reminder => (
            format!("📋 {}", name),
            format!("Reminder: Due {}", time_description(offset)),
        ),
        NotificationKind::Due => (
            format!("🔔 {}", name),
            "Due now - Time to get started!".to_string(),
        ),
        NotificationKind::Overdue => (
            format!("❗ {}", name),
            format!("Overdue {} - Complete when you can", time_description(offset)),
        ),
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// Relative phrase for how far the due date is from the notification.
/// Reminders look ahead ("in 3 hours"), follow-ups look back ("yesterday").
fn time_description(offset: &NotificationOffset) -> String {
    let value = offset.value;
    if value == 0 {
        return "soon".to_string();
    }
    let ahead = value < 0;
    let abs = value.saturating_abs();
    let phrase = |ahead_text: String, behind_text: String| {
        if ahead { ahead_text } else { behind_text }
    };

    match offset.unit {
        NotificationUnit::Minutes if abs == 1 => {
            phrase("in 1 minute".into(), "1 minute ago".into())
        }
        NotificationUnit::Minutes if abs < 60 => {
            phrase(format!("in {} minutes", abs), format!("{} minutes ago", abs))
        }
        NotificationUnit::Hours if abs == 1 => phrase("in 1 hour".into(), "1 hour ago".into()),
        NotificationUnit::Hours if abs < 24 => {
            phrase(format!("in {} hours", abs), format!("{} hours ago", abs))
        }
        NotificationUnit::Days if abs == 1 => phrase("tomorrow".into(), "yesterday".into()),
        NotificationUnit::Days if abs == 7 => phrase("next week".into(), "last week".into()),
        NotificationUnit::Days if abs < 7 => {
            phrase(format!("in {} days", abs), format!("{} days ago", abs))
        }
        NotificationUnit::Days if abs < 30 => {
            let weeks = (abs as f64 / 7.0).round() as i64;
            phrase(format!("in {} weeks", weeks), format!("{} weeks ago", weeks))
        }
        unit => phrase(
            format!("in {} {}", abs, unit.symbol()),
            format!("{} {} ago", abs, unit.symbol()),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use NotificationUnit::*;

    fn off(value: i64, unit: NotificationUnit) -> NotificationOffset {
        NotificationOffset::new(value, unit)
    }

    #[test]
    fn descriptions_by_unit() {
        assert_eq!(time_description(&off(-1, Minutes)), "in 1 minute");
        assert_eq!(time_description(&off(45, Minutes)), "45 minutes ago");
        assert_eq!(time_description(&off(-90, Minutes)), "in 90 m");
        assert_eq!(time_description(&off(1, Hours)), "1 hour ago");
        assert_eq!(time_description(&off(-3, Hours)), "in 3 hours");
        assert_eq!(time_description(&off(30, Hours)), "30 h ago");
        assert_eq!(time_description(&off(-1, Days)), "tomorrow");
        assert_eq!(time_description(&off(1, Days)), "yesterday");
        assert_eq!(time_description(&off(-7, Days)), "next week");
        assert_eq!(time_description(&off(3, Days)), "3 days ago");
        assert_eq!(time_description(&off(-11, Days)), "in 2 weeks");
        assert_eq!(time_description(&off(10, Days)), "1 weeks ago");
        assert_eq!(time_description(&off(-45, Days)), "in 45 d");
        assert_eq!(time_description(&off(0, Days)), "soon");
    }

    #[test]
    fn texts_per_kind() {
        assert_eq!(
            notification_text("Water plants", &off(-3, Hours)),
            ("📋 Water plants".to_string(), "Reminder: Due in 3 hours".to_string())
        );
        assert_eq!(
            notification_text("Water plants", &off(0, Minutes)),
            ("🔔 Water plants".to_string(), "Due now - Time to get started!".to_string())
        );
        assert_eq!(
            notification_text("Water plants", &off(1, Days)),
            (
                "❗ Water plants".to_string(),
                "Overdue yesterday - Complete when you can".to_string()
            )
        );
    }

    #[test]
    fn long_names_are_truncated() {
        let (title, _) = notification_text("Reorganize the entire garage shelving", &off(0, Minutes));
        assert_eq!(title, "🔔 Reorganize the entire gar...");
    }

    #[test]
    fn plan_drops_past_fire_times() {
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let planned = plan("Take out bins", due, now, &NotificationTemplate::default());

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].kind, NotificationKind::Due);
        assert_eq!(planned[0].fire_at, due);
        assert_eq!(planned[1].kind, NotificationKind::Overdue);
        assert_eq!(planned[1].fire_at, Utc.with_ymd_and_hms(2026, 10, 21, 9, 0, 0).unwrap());
    }

    #[test]
    fn unrepresentable_fire_times_are_skipped() {
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        let template = NotificationTemplate::new(vec![off(999_999_999, Days), off(-1, Hours)], 5);
        let planned = plan("Renew lease", due, due - chrono::Duration::days(2), &template);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].offset, off(-1, Hours));
    }

    #[test]
    fn fire_time_equal_to_now_is_dropped() {
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        let template = NotificationTemplate::new(vec![off(0, Minutes)], 5);
        assert!(plan("Stretch", due, due, &template).is_empty());
    }
}
