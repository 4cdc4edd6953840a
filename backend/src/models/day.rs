//! Resolved agenda for a single calendar day.

use chrono::NaiveDate;
use serde::Serialize;

use super::entry::ScheduleEntry;
use super::timetable::BreakSlot;

/// One row of a day's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayItem {
    /// A matched entry or an "EMPTY" placeholder. `slot` is `None` for
    /// lessons whose start matches no canonical slot (sparse mode only).
    Lesson {
        slot: Option<u8>,
        entry: ScheduleEntry,
    },
    Break(BreakSlot),
}

impl DayItem {
    pub fn is_lesson(&self) -> bool {
        matches!(self, DayItem::Lesson { .. })
    }

    pub fn is_break(&self) -> bool {
        matches!(self, DayItem::Break(_))
    }

    pub fn as_entry(&self) -> Option<&ScheduleEntry> {
        match self {
            DayItem::Lesson { entry, .. } => Some(entry),
            DayItem::Break(_) => None,
        }
    }
}

/// Ordered lessons and breaks for one date. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAssembly {
    pub date: NaiveDate,
    pub items: Vec<DayItem>,
    /// Entries that occur on `date` but start off-grid, kept aside when the
    /// unscheduled policy is selected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unscheduled: Vec<ScheduleEntry>,
}

impl DayAssembly {
    pub fn new(date: NaiveDate, items: Vec<DayItem>) -> Self {
        Self {
            date,
            items,
            unscheduled: Vec::new(),
        }
    }

    /// True when at least one real (non-placeholder) lesson is present.
    pub fn has_lessons(&self) -> bool {
        self.lessons().any(|entry| !entry.is_empty_placeholder())
            || !self.unscheduled.is_empty()
    }

    pub fn lessons(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.items.iter().filter_map(DayItem::as_entry)
    }

    pub fn breaks(&self) -> impl Iterator<Item = &BreakSlot> {
        self.items.iter().filter_map(|item| match item {
            DayItem::Break(slot) => Some(slot),
            DayItem::Lesson { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.unscheduled.is_empty()
    }
}
