//! Day-slot assembly: turning a date's entries into an ordered agenda.
//!
//! Two layouts are supported:
//!
//! - **Dense**: every canonical lesson slot is emitted (matched entry or an
//!   "EMPTY" placeholder) interleaved with every canonical break.
//! - **Sparse**: only real lessons, ordered by start time, with a break
//!   between two lessons when the grid has a break spanning exactly
//!   `(previous end, next start)`.
//!
//! Slot numbers always come from the grid, never from input order.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{DayAssembly, DayItem, ScheduleEntry, Timetable};
use crate::services::recurrence::filter_for_date;

/// Agenda layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyMode {
    #[default]
    Dense,
    Sparse,
}

impl AssemblyMode {
    /// Map the user's "show empty lessons" preference to a layout.
    pub fn from_show_empty_lessons(show_empty: bool) -> Self {
        if show_empty {
            AssemblyMode::Dense
        } else {
            AssemblyMode::Sparse
        }
    }
}

/// What to do with an entry whose start matches no canonical lesson slot
/// when building a dense agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Leave it out of the agenda.
    #[default]
    Drop,
    /// Fail the whole assembly with a validation error.
    Reject,
    /// Collect it into [`DayAssembly::unscheduled`].
    Unscheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblyOptions {
    #[serde(default)]
    pub mode: AssemblyMode,
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

impl AssemblyOptions {
    pub fn new(mode: AssemblyMode, unmatched: UnmatchedPolicy) -> Self {
        Self { mode, unmatched }
    }

    pub fn dense() -> Self {
        Self::new(AssemblyMode::Dense, UnmatchedPolicy::Drop)
    }

    pub fn sparse() -> Self {
        Self::new(AssemblyMode::Sparse, UnmatchedPolicy::Drop)
    }
}

fn validate_all<'a, I>(entries: I) -> ScheduleResult<()>
where
    I: IntoIterator<Item = &'a ScheduleEntry>,
{
    entries.into_iter().try_for_each(ScheduleEntry::validate)
}

/// Dense agenda: all lesson slots plus all breaks, in grid order.
///
/// `entries` are expected to already occur on `date`. When two entries start
/// in the same slot, the later one in start-time order wins.
///
/// # Errors
/// `ScheduleError::Validation` when an entry ends before it starts, or when
/// `unmatched` is [`UnmatchedPolicy::Reject`] and an entry starts off-grid.
pub fn assemble_dense(
    timetable: &Timetable,
    date: NaiveDate,
    entries: &[&ScheduleEntry],
    unmatched: UnmatchedPolicy,
) -> ScheduleResult<DayAssembly> {
    validate_all(entries.iter().copied())?;

    let mut sorted: Vec<&ScheduleEntry> = entries.to_vec();
    sorted.sort_by_key(|entry| entry.start_time());

    let mut by_slot: BTreeMap<u8, &ScheduleEntry> = BTreeMap::new();
    let mut unscheduled = Vec::new();

    for entry in sorted {
        match timetable.lesson_number_for(entry.start_time()) {
            Some(number) => {
                if let Some(previous) = by_slot.insert(number, entry) {
                    warn!(
                        "Slot {} on {} holds both '{}' and '{}'; keeping the latter",
                        number, date, previous.discipline, entry.discipline
                    );
                }
            }
            None => match unmatched {
                UnmatchedPolicy::Drop => {
                    debug!(
                        "Dropping '{}' at {}: start matches no lesson slot",
                        entry.discipline, entry.start
                    );
                }
                UnmatchedPolicy::Reject => {
                    return Err(ScheduleError::validation(format!(
                        "entry '{}' starts at {} which matches no lesson slot",
                        entry.discipline,
                        entry.start_time().format("%H:%M")
                    )));
                }
                UnmatchedPolicy::Unscheduled => unscheduled.push(entry.clone()),
            },
        }
    }

    let mut items = Vec::with_capacity(timetable.lessons().len() + timetable.breaks().len());
    for (index, slot) in timetable.lessons().iter().enumerate() {
        let entry = match by_slot.get(&slot.number) {
            Some(entry) => (*entry).clone(),
            None => ScheduleEntry::empty_placeholder(slot, date),
        };
        items.push(DayItem::Lesson {
            slot: Some(slot.number),
            entry,
        });
        if let Some(break_slot) = timetable.breaks().get(index) {
            items.push(DayItem::Break(*break_slot));
        }
    }

    let mut day = DayAssembly::new(date, items);
    day.unscheduled = unscheduled;
    Ok(day)
}

/// Sparse agenda: real lessons only, with exact-match breaks between them.
///
/// "EMPTY" placeholders in the input are ignored.
///
/// # Errors
/// `ScheduleError::Validation` when an entry ends before it starts.
pub fn assemble_sparse(
    timetable: &Timetable,
    date: NaiveDate,
    entries: &[&ScheduleEntry],
) -> ScheduleResult<DayAssembly> {
    validate_all(entries.iter().copied())?;

    let mut lessons: Vec<&ScheduleEntry> = entries
        .iter()
        .copied()
        .filter(|entry| !entry.is_empty_placeholder())
        .collect();
    lessons.sort_by_key(|entry| entry.start_time());

    let mut items = Vec::with_capacity(lessons.len() * 2);
    let mut previous: Option<&ScheduleEntry> = None;

    for entry in lessons {
        if let Some(prev) = previous {
            if let Some(break_slot) = timetable.break_between(prev.end_time(), entry.start_time()) {
                items.push(DayItem::Break(*break_slot));
            }
        }
        items.push(DayItem::Lesson {
            slot: timetable.lesson_number_for(entry.start_time()),
            entry: entry.clone(),
        });
        previous = Some(entry);
    }

    Ok(DayAssembly::new(date, items))
}

/// Resolve which entries occur on `date` and assemble them.
pub fn assemble_day(
    entries: &[ScheduleEntry],
    date: NaiveDate,
    timetable: &Timetable,
    options: AssemblyOptions,
) -> ScheduleResult<DayAssembly> {
    let occurring = filter_for_date(entries, date);
    debug!(
        "{} of {} entries occur on {}",
        occurring.len(),
        entries.len(),
        date
    );

    match options.mode {
        AssemblyMode::Dense => assemble_dense(timetable, date, &occurring, options.unmatched),
        AssemblyMode::Sparse => assemble_sparse(timetable, date, &occurring),
    }
}

#[cfg(test)]
#[path = "assembly_tests.rs"]
mod assembly_tests;
