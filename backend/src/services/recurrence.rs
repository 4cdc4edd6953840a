//! Recurrence resolution: does a schedule entry occur on a given date?
//!
//! An entry occurs on its own start date unless that date is listed as an
//! exception. With a weekly rule it also occurs on every later date that
//! shares its weekday, lies within the rule's `until` bound, and sits a whole
//! multiple of `interval` weeks after the start.

use chrono::{Datelike, NaiveDate};
use log::debug;

use crate::models::{Frequency, ScheduleEntry};
use crate::services::academic_week::weeks_between;

/// Whether `date` is one of the entry's exception dates.
pub fn is_exception(entry: &ScheduleEntry, date: NaiveDate) -> bool {
    entry.exceptions.contains(&date)
}

/// Whether the entry's recurrence rule produces an occurrence on `date`.
///
/// Only checks the rule itself (start bound, `until`, interval); the weekday
/// and exception checks are done by [`occurs_on`]. Entries without a rule
/// never recur.
pub fn in_recurrence(entry: &ScheduleEntry, date: NaiveDate) -> bool {
    let Some(rule) = entry.recurrence.as_ref() else {
        return false;
    };
    let start = entry.start_date();

    if date < start {
        return false;
    }

    if let Some(until) = rule.until {
        if date.and_time(chrono::NaiveTime::MIN) > until {
            return false;
        }
    }

    if weeks_between(start, date) % rule.effective_interval() != 0 {
        return false;
    }

    if let Frequency::Other(ref name) = rule.frequency {
        debug!(
            "Unsupported recurrence frequency '{}' on '{}', treating as weekly",
            name, entry.discipline
        );
    }

    true
}

/// Decide whether `entry` occurs on `date`.
pub fn occurs_on(entry: &ScheduleEntry, date: NaiveDate) -> bool {
    if is_exception(entry, date) {
        return false;
    }

    if entry.start_date() == date {
        return true;
    }

    if entry.start.weekday() != date.weekday() {
        return false;
    }

    in_recurrence(entry, date)
}

/// Entries occurring on `date`, ordered by start time.
pub fn filter_for_date(entries: &[ScheduleEntry], date: NaiveDate) -> Vec<&ScheduleEntry> {
    let mut matching: Vec<&ScheduleEntry> = entries
        .iter()
        .filter(|entry| occurs_on(entry, date))
        .collect();
    matching.sort_by_key(|entry| entry.start_time());
    matching
}

#[cfg(test)]
#[path = "recurrence_tests.rs"]
mod recurrence_tests;
