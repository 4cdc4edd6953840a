//! The institution's daily lesson/break grid.
//!
//! Slot boundaries are reference data: they are injected through
//! [`crate::config::TimetableConfig`] rather than spread across call sites.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};

/// A numbered teaching period with fixed time-of-day boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonSlot {
    pub number: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl LessonSlot {
    pub fn new(number: u8, start: NaiveTime, end: NaiveTime) -> Self {
        Self { number, start, end }
    }
}

/// A fixed interval between two consecutive lesson slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreakSlot {
    pub number: u8,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub is_long: bool,
}

impl BreakSlot {
    pub fn new(number: u8, start: NaiveTime, end: NaiveTime, is_long: bool) -> Self {
        Self {
            number,
            start,
            end,
            is_long,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// "HH:MM-HH:MM"
    pub fn formatted_time(&self) -> String {
        format!(
            "{}-{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Canonical lesson and break grid.
///
/// Only constructible through [`Timetable::new`] or the built-in grids, so a
/// value of this type is always consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timetable {
    lessons: Vec<LessonSlot>,
    breaks: Vec<BreakSlot>,
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

impl Timetable {
    /// Build a grid, checking that it is internally consistent.
    ///
    /// # Errors
    /// `ScheduleError::Timetable` when slot numbers are not `1..=n` in order,
    /// a slot does not start before it ends, lesson slots overlap or are out
    /// of order, or the break count is not one less than the lesson count.
    pub fn new(lessons: Vec<LessonSlot>, breaks: Vec<BreakSlot>) -> ScheduleResult<Self> {
        if lessons.is_empty() {
            return Err(ScheduleError::timetable("at least one lesson slot is required"));
        }

        for (index, slot) in lessons.iter().enumerate() {
            if slot.number as usize != index + 1 {
                return Err(ScheduleError::timetable(format!(
                    "lesson slot at position {} is numbered {}",
                    index + 1,
                    slot.number
                )));
            }
            if slot.start >= slot.end {
                return Err(ScheduleError::timetable(format!(
                    "lesson slot {} does not start before it ends",
                    slot.number
                )));
            }
        }

        for pair in lessons.windows(2) {
            if pair[1].start < pair[0].end {
                return Err(ScheduleError::timetable(format!(
                    "lesson slot {} starts before slot {} ends",
                    pair[1].number, pair[0].number
                )));
            }
        }

        if breaks.len() + 1 != lessons.len() {
            return Err(ScheduleError::timetable(format!(
                "{} lesson slots need {} breaks, got {}",
                lessons.len(),
                lessons.len() - 1,
                breaks.len()
            )));
        }

        for (index, slot) in breaks.iter().enumerate() {
            if slot.number as usize != index + 1 {
                return Err(ScheduleError::timetable(format!(
                    "break slot at position {} is numbered {}",
                    index + 1,
                    slot.number
                )));
            }
            if slot.start >= slot.end {
                return Err(ScheduleError::timetable(format!(
                    "break slot {} does not start before it ends",
                    slot.number
                )));
            }
        }

        Ok(Self { lessons, breaks })
    }

    /// Grid with the fifth lesson at 16:00, used by earlier timetables.
    pub fn legacy_1600() -> Self {
        Self {
            lessons: vec![
                LessonSlot::new(1, hm(9, 0), hm(10, 30)),
                LessonSlot::new(2, hm(10, 40), hm(12, 10)),
                LessonSlot::new(3, hm(12, 40), hm(14, 10)),
                LessonSlot::new(4, hm(14, 20), hm(15, 50)),
                LessonSlot::new(5, hm(16, 0), hm(17, 30)),
                LessonSlot::new(6, hm(17, 40), hm(19, 10)),
                LessonSlot::new(7, hm(19, 20), hm(20, 50)),
            ],
            breaks: vec![
                BreakSlot::new(1, hm(10, 30), hm(10, 40), false),
                BreakSlot::new(2, hm(12, 10), hm(12, 40), true),
                BreakSlot::new(3, hm(14, 10), hm(14, 20), false),
                BreakSlot::new(4, hm(15, 50), hm(16, 0), false),
                BreakSlot::new(5, hm(17, 30), hm(17, 40), false),
                BreakSlot::new(6, hm(19, 10), hm(19, 20), false),
            ],
        }
    }

    pub fn lessons(&self) -> &[LessonSlot] {
        &self.lessons
    }

    pub fn breaks(&self) -> &[BreakSlot] {
        &self.breaks
    }

    pub fn lesson_slot(&self, number: u8) -> Option<&LessonSlot> {
        self.lessons.iter().find(|slot| slot.number == number)
    }

    /// Slot number whose start equals `start` exactly.
    pub fn lesson_number_for(&self, start: NaiveTime) -> Option<u8> {
        self.lessons
            .iter()
            .find(|slot| slot.start == start)
            .map(|slot| slot.number)
    }

    /// Break whose boundaries are exactly `(prev_end, next_start)`.
    pub fn break_between(&self, prev_end: NaiveTime, next_start: NaiveTime) -> Option<&BreakSlot> {
        self.breaks
            .iter()
            .find(|slot| slot.start == prev_end && slot.end == next_start)
    }
}

impl Default for Timetable {
    /// Current grid: fifth lesson at 16:20 with a long break before it.
    fn default() -> Self {
        Self {
            lessons: vec![
                LessonSlot::new(1, hm(9, 0), hm(10, 30)),
                LessonSlot::new(2, hm(10, 40), hm(12, 10)),
                LessonSlot::new(3, hm(12, 40), hm(14, 10)),
                LessonSlot::new(4, hm(14, 20), hm(15, 50)),
                LessonSlot::new(5, hm(16, 20), hm(17, 50)),
                LessonSlot::new(6, hm(18, 0), hm(19, 30)),
                LessonSlot::new(7, hm(19, 40), hm(21, 10)),
            ],
            breaks: vec![
                BreakSlot::new(1, hm(10, 30), hm(10, 40), false),
                BreakSlot::new(2, hm(12, 10), hm(12, 40), true),
                BreakSlot::new(3, hm(14, 10), hm(14, 20), false),
                BreakSlot::new(4, hm(15, 50), hm(16, 20), true),
                BreakSlot::new(5, hm(17, 50), hm(18, 0), false),
                BreakSlot::new(6, hm(19, 30), hm(19, 40), false),
            ],
        }
    }
}
