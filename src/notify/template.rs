use crate::notify::offset::{NotificationOffset, NotificationUnit, Timing};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_MAX_NOTIFICATIONS: usize = 5;

const REMINDER_SUGGESTIONS: [NotificationOffset; 3] = [
    NotificationOffset::new(-1, NotificationUnit::Days),
    NotificationOffset::new(-3, NotificationUnit::Hours),
    NotificationOffset::new(-30, NotificationUnit::Minutes),
];

const FOLLOWUP_SUGGESTIONS: [NotificationOffset; 3] = [
    NotificationOffset::new(1, NotificationUnit::Days),
    NotificationOffset::new(3, NotificationUnit::Days),
    NotificationOffset::new(7, NotificationUnit::Days),
];

// Timeline brackets, in percent of the bar width
const DUE_ANCHOR: f64 = 50.0;
const BEFORE_NEAR: f64 = 45.0;
const AFTER_NEAR: f64 = 55.0;
const SPREAD: f64 = 35.0;
const BEFORE_DEFAULT: f64 = 30.0;
const AFTER_DEFAULT: f64 = 70.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    CapacityExceeded { max: usize },
    DuplicateOffset { offset: NotificationOffset },
    OnDueConflict,
    DueAlertExists,
    SuggestionsExhausted { kind: SmartKind },
    IndexOutOfRange { index: usize, len: usize },
    LastOffset,
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::CapacityExceeded { max } => {
                write!(f, "At most {} notifications can be configured.", max)
            }
            TemplateError::DuplicateOffset { .. } => write!(
                f,
                "This notification setting already exists. Please use a different timing."
            ),
            TemplateError::OnDueConflict => write!(
                f,
                "Only one notification can be set to \"On Due\". Please choose a different timing."
            ),
            TemplateError::DueAlertExists => {
                write!(f, "Only one \"Due Alert\" notification is allowed.")
            }
            TemplateError::SuggestionsExhausted { kind } => {
                write!(f, "All common {} times are already configured.", kind)
            }
            TemplateError::IndexOutOfRange { index, len } => {
                write!(f, "No notification at position {} (have {}).", index, len)
            }
            TemplateError::LastOffset => {
                write!(f, "At least one notification must remain.")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Which kind of notification `add_smart` should suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmartKind {
    Reminder,
    Due,
    Followup,
}

impl fmt::Display for SmartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmartKind::Reminder => "reminder",
            SmartKind::Due => "due",
            SmartKind::Followup => "followup",
        };
        f.write_str(name)
    }
}

impl FromStr for SmartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reminder" => Ok(SmartKind::Reminder),
            "due" => Ok(SmartKind::Due),
            "followup" | "follow-up" => Ok(SmartKind::Followup),
            other => Err(format!("unknown notification kind '{}'", other)),
        }
    }
}

/// A single-field edit made through the UI form of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetField {
    Timing(Timing),
    DisplayValue(i64),
    Unit(NotificationUnit),
}

/// One offset placed on the notification timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub index: usize,
    pub rank: usize,
    pub position: f64,
    pub offset: NotificationOffset,
}

/// Ordered, bounded list of notification offsets for one task.
///
/// Every mutation is pure: it returns a new template or the reason it was
/// rejected, and `self` is left untouched either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationTemplate {
    offsets: Vec<NotificationOffset>,
    max_notifications: usize,
}

impl Default for NotificationTemplate {
    /// One day before, on due, one day after.
    fn default() -> Self {
        Self::new(
            vec![
                NotificationOffset::new(-1, NotificationUnit::Days),
                NotificationOffset::on_due(),
                NotificationOffset::new(1, NotificationUnit::Days),
            ],
            DEFAULT_MAX_NOTIFICATIONS,
        )
    }
}

impl NotificationTemplate {
    pub fn new(offsets: Vec<NotificationOffset>, max_notifications: usize) -> Self {
        Self {
            offsets,
            max_notifications,
        }
    }

    /// Builds a template from user input, enforcing the same rules as the
    /// mutations: capacity, a single on-due entry and no duplicates.
    pub fn try_new(
        offsets: Vec<NotificationOffset>,
        max_notifications: usize,
    ) -> Result<Self, TemplateError> {
        if offsets.len() > max_notifications {
            return Err(TemplateError::CapacityExceeded {
                max: max_notifications,
            });
        }
        let mut template = Self::new(Vec::with_capacity(offsets.len()), max_notifications);
        for offset in offsets {
            if template.would_conflict_on_due(offset.value, None) {
                return Err(TemplateError::OnDueConflict);
            }
            if template.is_duplicate(&offset, None) {
                return Err(TemplateError::DuplicateOffset { offset });
            }
            template.offsets.push(offset);
        }
        Ok(template)
    }

    pub fn offsets(&self) -> &[NotificationOffset] {
        &self.offsets
    }

    pub fn max_notifications(&self) -> usize {
        self.max_notifications
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn into_offsets(self) -> Vec<NotificationOffset> {
        self.offsets
    }

    /// Whether another entry has the same raw `(value, unit)`. `-60m` and
    /// `-1h` are different entries here.
    pub fn is_duplicate(&self, candidate: &NotificationOffset, exclude: Option<usize>) -> bool {
        self.offsets
            .iter()
            .enumerate()
            .any(|(i, o)| Some(i) != exclude && o.value == candidate.value && o.unit == candidate.unit)
    }

    pub fn would_conflict_on_due(&self, candidate_value: i64, exclude: Option<usize>) -> bool {
        candidate_value == 0
            && self
                .offsets
                .iter()
                .enumerate()
                .any(|(i, o)| Some(i) != exclude && o.is_on_due())
    }

    /// Applies one form edit to the entry at `index`.
    pub fn update(&self, index: usize, field: OffsetField) -> Result<Self, TemplateError> {
        let current = self.offsets.get(index).ok_or(TemplateError::IndexOutOfRange {
            index,
            len: self.offsets.len(),
        })?;

        let mut ui = current.to_ui();
        match field {
            OffsetField::Timing(timing) => {
                ui.timing = timing;
                if timing == Timing::OnDue {
                    ui.display_value = 0;
                }
            }
            OffsetField::DisplayValue(value) => ui.display_value = value.max(0),
            OffsetField::Unit(unit) => ui.unit = unit,
        }
        let edited = NotificationOffset::from_ui(ui);

        if self.would_conflict_on_due(edited.value, Some(index)) {
            tracing::debug!(index, %edited, "edit rejected: second on-due notification");
            return Err(TemplateError::OnDueConflict);
        }
        if self.is_duplicate(&edited, Some(index)) {
            tracing::debug!(index, %edited, "edit rejected: duplicate notification");
            return Err(TemplateError::DuplicateOffset { offset: edited });
        }

        let mut offsets = self.offsets.clone();
        offsets[index] = edited;
        Ok(Self::new(offsets, self.max_notifications))
    }

    /// Appends a suggested notification of the given kind.
    pub fn add_smart(&self, kind: SmartKind) -> Result<Self, TemplateError> {
        if self.offsets.len() >= self.max_notifications {
            tracing::debug!(max = self.max_notifications, "add rejected: template full");
            return Err(TemplateError::CapacityExceeded {
                max: self.max_notifications,
            });
        }

        let added = match kind {
            SmartKind::Due => {
                if self.offsets.iter().any(NotificationOffset::is_on_due) {
                    return Err(TemplateError::DueAlertExists);
                }
                NotificationOffset::on_due()
            }
            SmartKind::Reminder => self.first_free(&REMINDER_SUGGESTIONS, kind)?,
            SmartKind::Followup => self.first_free(&FOLLOWUP_SUGGESTIONS, kind)?,
        };

        tracing::debug!(%kind, %added, "notification added");
        let mut offsets = self.offsets.clone();
        offsets.push(added);
        Ok(Self::new(offsets, self.max_notifications))
    }

    fn first_free(
        &self,
        suggestions: &[NotificationOffset],
        kind: SmartKind,
    ) -> Result<NotificationOffset, TemplateError> {
        suggestions
            .iter()
            .find(|s| !self.is_duplicate(s, None))
            .copied()
            .ok_or(TemplateError::SuggestionsExhausted { kind })
    }

    /// Removes the entry at `index`. The last remaining entry cannot be removed.
    pub fn remove(&self, index: usize) -> Result<Self, TemplateError> {
        if index >= self.offsets.len() {
            return Err(TemplateError::IndexOutOfRange {
                index,
                len: self.offsets.len(),
            });
        }
        if self.offsets.len() == 1 {
            return Err(TemplateError::LastOffset);
        }
        let mut offsets = self.offsets.clone();
        offsets.remove(index);
        Ok(Self::new(offsets, self.max_notifications))
    }

    /// 1-based chronological rank of each entry, indexed like `offsets()`.
    /// Equal durations keep list order.
    pub fn chronological_rank(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.offsets.len()).collect();
        order.sort_by_key(|&i| self.offsets[i].signed_minutes());

        let mut ranks = vec![0; self.offsets.len()];
        for (position, index) in order.into_iter().enumerate() {
            ranks[index] = position + 1;
        }
        ranks
    }

    /// Horizontal position of `offset` on a timeline whose due date sits at 50%.
    /// Before-due entries spread over 10..=45, after-due entries over 55..=90,
    /// scaled against the furthest entry on the same side.
    pub fn timeline_position(&self, offset: &NotificationOffset) -> f64 {
        let minutes = offset.signed_minutes();
        if minutes == 0 {
            return DUE_ANCHOR;
        }

        let all = self.offsets.iter().map(NotificationOffset::signed_minutes);
        if minutes < 0 {
            let furthest = all.min().unwrap_or(0).min(0);
            if furthest == 0 {
                return BEFORE_DEFAULT;
            }
            let ratio = (minutes as f64 / furthest as f64).min(1.0);
            BEFORE_NEAR - ratio * SPREAD
        } else {
            let furthest = all.max().unwrap_or(0).max(0);
            if furthest == 0 {
                return AFTER_DEFAULT;
            }
            let ratio = (minutes as f64 / furthest as f64).min(1.0);
            AFTER_NEAR + ratio * SPREAD
        }
    }

    /// Entries in chronological order with their rank and timeline position.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let ranks = self.chronological_rank();
        let mut entries: Vec<TimelineEntry> = self
            .offsets
            .iter()
            .zip(ranks)
            .enumerate()
            .map(|(index, (offset, rank))| TimelineEntry {
                index,
                rank,
                position: self.timeline_position(offset),
                offset: *offset,
            })
            .collect();
        entries.sort_by_key(|e| e.rank);
        entries
    }
}
