//! Explicit view state for the day screen.
//!
//! The selected date, current group and layout preference travel as a plain
//! value; resolution reads them and never mutates shared state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleResult;
use crate::models::{DayAssembly, ScheduleEntry, Timetable};
use crate::services::academic_week::{AcademicCalendar, WeekParity};
use crate::services::assembly::{assemble_day, AssemblyMode, AssemblyOptions, UnmatchedPolicy};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_date: NaiveDate,
    pub current_group: String,
    pub show_empty_lessons: bool,
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

impl ViewState {
    pub fn new(selected_date: NaiveDate, current_group: impl Into<String>) -> Self {
        Self {
            selected_date,
            current_group: current_group.into(),
            show_empty_lessons: true,
            unmatched: UnmatchedPolicy::default(),
        }
    }

    /// Same view, different date.
    pub fn select_date(&self, date: NaiveDate) -> Self {
        Self {
            selected_date: date,
            ..self.clone()
        }
    }

    pub fn with_show_empty_lessons(mut self, show: bool) -> Self {
        self.show_empty_lessons = show;
        self
    }

    pub fn options(&self) -> AssemblyOptions {
        AssemblyOptions::new(
            AssemblyMode::from_show_empty_lessons(self.show_empty_lessons),
            self.unmatched,
        )
    }

    /// Agenda for the selected date.
    pub fn day(&self, entries: &[ScheduleEntry], timetable: &Timetable) -> ScheduleResult<DayAssembly> {
        assemble_day(entries, self.selected_date, timetable, self.options())
    }

    pub fn week_number(&self, calendar: &AcademicCalendar) -> u32 {
        calendar.week_number(self.selected_date)
    }

    pub fn week_parity(&self, calendar: &AcademicCalendar) -> WeekParity {
        calendar.parity(self.selected_date)
    }
}
