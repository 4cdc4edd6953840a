//! Multi-day agenda windows, as shown by the home-screen widget.

use chrono::{Duration, NaiveDate};
use log::debug;
use serde::Serialize;

use crate::error::ScheduleResult;
use crate::models::{DayAssembly, ScheduleEntry, Timetable};
use crate::services::assembly::{assemble_day, AssemblyOptions};

/// Days shown by the widget.
pub const DEFAULT_AGENDA_DAYS: u32 = 14;

/// Days per widget page.
pub const DAYS_PER_PAGE: usize = 3;

/// Assembled days for a contiguous date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agenda {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayAssembly>,
}

impl Agenda {
    /// Days that carry at least one real lesson, in date order.
    pub fn days_with_lessons(&self) -> impl Iterator<Item = &DayAssembly> {
        self.days.iter().filter(|day| day.has_lessons())
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAssembly> {
        self.days.iter().find(|day| day.date == date)
    }
}

/// Assemble `days` consecutive days starting at `start`.
///
/// A `days` value of 0 yields an empty agenda whose `end` equals `start`.
pub fn build_agenda(
    entries: &[ScheduleEntry],
    timetable: &Timetable,
    start: NaiveDate,
    days: u32,
    options: AssemblyOptions,
) -> ScheduleResult<Agenda> {
    let assembled = (0..days)
        .map(|offset| {
            assemble_day(entries, start + Duration::days(offset as i64), timetable, options)
        })
        .collect::<ScheduleResult<Vec<_>>>()?;

    let end = start + Duration::days(days.saturating_sub(1) as i64);
    debug!(
        "Built agenda {}..={} with {} lesson days",
        start,
        end,
        assembled.iter().filter(|day| day.has_lessons()).count()
    );

    Ok(Agenda {
        start,
        end,
        days: assembled,
    })
}

/// Page offset over an agenda's days, moving in steps of [`DAYS_PER_PAGE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AgendaPager {
    offset: usize,
}

impl AgendaPager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Advance one page without passing the last full page.
    pub fn scroll_down(&mut self, total_days: usize) -> usize {
        let max_offset = total_days.saturating_sub(DAYS_PER_PAGE);
        self.offset = (self.offset + DAYS_PER_PAGE).min(max_offset);
        self.offset
    }

    pub fn scroll_up(&mut self) -> usize {
        self.offset = self.offset.saturating_sub(DAYS_PER_PAGE);
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    pub fn can_scroll_down(&self, total_days: usize) -> bool {
        self.offset + DAYS_PER_PAGE < total_days
    }

    pub fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    /// The slice of `days` visible at the current offset.
    pub fn page<'a, T>(&self, days: &'a [T]) -> &'a [T] {
        let start = self.offset.min(days.len());
        let end = (start + DAYS_PER_PAGE).min(days.len());
        &days[start..end]
    }
}
