//! Schedule entries as delivered by the schedule server or the local cache.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::timetable::LessonSlot;

/// Kind of lesson, carried on the wire as a short tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LessonType {
    /// "LK"
    Lecture,
    /// "PR"
    Practice,
    /// "LAB"
    Laboratory,
    /// "EMPTY" - synthesized for unfilled slots, never sent by the server
    Empty,
    Other(String),
}

impl LessonType {
    pub fn tag(&self) -> &str {
        match self {
            LessonType::Lecture => "LK",
            LessonType::Practice => "PR",
            LessonType::Laboratory => "LAB",
            LessonType::Empty => "EMPTY",
            LessonType::Other(tag) => tag,
        }
    }
}

impl From<&str> for LessonType {
    fn from(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "LK" => LessonType::Lecture,
            "PR" => LessonType::Practice,
            "LAB" => LessonType::Laboratory,
            "EMPTY" => LessonType::Empty,
            _ => LessonType::Other(tag.trim().to_string()),
        }
    }
}

impl From<String> for LessonType {
    fn from(tag: String) -> Self {
        LessonType::from(tag.as_str())
    }
}

impl From<LessonType> for String {
    fn from(lesson_type: LessonType) -> Self {
        lesson_type.tag().to_string()
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Repetition frequency of a recurrence rule.
///
/// Only weekly repetition is implemented. Any other value is kept verbatim so
/// it survives a cache round trip, and the resolver treats it as weekly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    Weekly,
    Other(String),
}

impl Frequency {
    pub fn is_weekly(&self) -> bool {
        matches!(self, Frequency::Weekly)
    }
}

impl FromStr for Frequency {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "WEEKLY" | "" => Frequency::Weekly,
            _ => Frequency::Other(s.trim().to_string()),
        })
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(frequency) => frequency,
            Err(never) => match never {},
        }
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Weekly => f.write_str("WEEKLY"),
            Frequency::Other(s) => f.write_str(s),
        }
    }
}

/// Weekly repeat pattern attached to a schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecurrenceRule {
    #[serde(default)]
    pub frequency: Frequency,
    /// Repeat every N weeks; `None` or values below 1 mean every week.
    #[serde(default)]
    pub interval: Option<i32>,
    /// Last moment a repetition may fall on; `None` means unbounded.
    #[serde(default)]
    pub until: Option<NaiveDateTime>,
}

impl RecurrenceRule {
    pub fn weekly(interval: i32) -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval: Some(interval),
            until: None,
        }
    }

    pub fn with_until(mut self, until: NaiveDateTime) -> Self {
        self.until = Some(until);
        self
    }

    /// Interval used for resolution: never below 1.
    pub fn effective_interval(&self) -> i64 {
        match self.interval {
            Some(n) if n >= 1 => n as i64,
            _ => 1,
        }
    }
}

/// One recurring or one-off lesson definition.
///
/// Entries are immutable value records: they come from the server JSON, an
/// iCalendar export, or the local cache, and are never mutated by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub discipline: String,
    pub lesson_type: LessonType,
    #[serde(rename = "startTime")]
    pub start: NaiveDateTime,
    #[serde(rename = "endTime")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub groups_summary: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default)]
    pub exceptions: Vec<NaiveDate>,
}

impl ScheduleEntry {
    /// Create a one-off entry with empty room/teacher/group details.
    pub fn new(
        discipline: impl Into<String>,
        lesson_type: LessonType,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            discipline: discipline.into(),
            lesson_type,
            start,
            end,
            room: String::new(),
            teacher: String::new(),
            groups: Vec::new(),
            groups_summary: String::new(),
            description: None,
            recurrence: None,
            exceptions: Vec::new(),
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    pub fn with_exceptions(mut self, exceptions: Vec<NaiveDate>) -> Self {
        self.exceptions = exceptions;
        self
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = room.into();
        self
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = teacher.into();
        self
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups_summary = summarize_groups(&groups);
        self.groups = groups;
        self
    }

    /// Placeholder occupying an unfilled lesson slot on `date`.
    pub fn empty_placeholder(slot: &LessonSlot, date: NaiveDate) -> Self {
        Self::new(
            "",
            LessonType::Empty,
            date.and_time(slot.start),
            date.and_time(slot.end),
        )
    }

    pub fn is_empty_placeholder(&self) -> bool {
        self.lesson_type == LessonType::Empty
    }

    /// Calendar date of the original occurrence.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start.time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end.time()
    }

    pub fn weekday(&self) -> Weekday {
        self.start.weekday()
    }

    /// Check the entry's data invariants.
    ///
    /// # Errors
    /// `ScheduleError::Validation` when the end time precedes the start time.
    /// A non-positive recurrence interval is accepted and resolves as weekly.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.end < self.start {
            return Err(ScheduleError::validation(format!(
                "entry '{}' ends at {} before it starts at {}",
                self.discipline, self.end, self.start
            )));
        }

        Ok(())
    }
}

/// Sorted, comma-joined group list as shown under a lesson.
pub fn summarize_groups(groups: &[String]) -> String {
    let mut sorted: Vec<&str> = groups.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(", ")
}
