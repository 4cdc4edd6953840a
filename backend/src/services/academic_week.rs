//! Academic week numbering and odd/even week parity.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Whole weeks from `from` to `to`, truncated toward zero.
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days() / 7
}

/// Odd/even week flag. The reference week is week 1, hence odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Odd,
    Even,
}

impl WeekParity {
    /// Floored week distance mod 2: 0 for odd weeks, 1 for even weeks.
    pub fn index(self) -> u8 {
        match self {
            WeekParity::Odd => 0,
            WeekParity::Even => 1,
        }
    }

    pub fn is_even(self) -> bool {
        self == WeekParity::Even
    }
}

/// Parity of the week containing `date`, counted from `reference`.
///
/// Week distance is floored so every day of a week shares one parity, also
/// before the reference date.
pub fn week_parity(reference: NaiveDate, date: NaiveDate) -> WeekParity {
    let weeks = (date - reference).num_days().div_euclid(7);
    if weeks.rem_euclid(2) == 0 {
        WeekParity::Odd
    } else {
        WeekParity::Even
    }
}

/// Which half of the academic year a date falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semester {
    Autumn,
    Spring,
}

/// Semester boundaries and week caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicCalendar {
    /// Reference date for odd/even parity.
    pub parity_reference: NaiveDate,
    /// Month and day the autumn semester starts.
    pub autumn_start: (u32, u32),
    /// Month and day the spring semester starts.
    pub spring_start: (u32, u32),
    pub autumn_max_weeks: u32,
    pub spring_max_weeks: u32,
}

impl Default for AcademicCalendar {
    fn default() -> Self {
        Self {
            parity_reference: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap_or(NaiveDate::MIN),
            autumn_start: (9, 1),
            spring_start: (2, 11),
            autumn_max_weeks: 17,
            spring_max_weeks: 20,
        }
    }
}

impl AcademicCalendar {
    fn start_in(year: i32, (month, day): (u32, u32)) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day)
            .or_else(|| NaiveDate::from_ymd_opt(year, month, 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Semester containing `date` and the date it started.
    ///
    /// September onwards belongs to the autumn semester of the same year;
    /// dates on or after the spring start belong to spring; anything earlier
    /// in the year is the tail of the previous autumn semester.
    pub fn semester_of(&self, date: NaiveDate) -> (Semester, NaiveDate) {
        let year = date.year();
        let spring = Self::start_in(year, self.spring_start);

        if date.month() >= self.autumn_start.0 {
            (Semester::Autumn, Self::start_in(year, self.autumn_start))
        } else if date >= spring {
            (Semester::Spring, spring)
        } else {
            (Semester::Autumn, Self::start_in(year - 1, self.autumn_start))
        }
    }

    /// Week ordinal within the semester, clamped to `1..=cap`.
    pub fn week_number(&self, date: NaiveDate) -> u32 {
        let (semester, start) = self.semester_of(date);
        let cap = match semester {
            Semester::Autumn => self.autumn_max_weeks,
            Semester::Spring => self.spring_max_weeks,
        };
        let number = weeks_between(start, date) + 1;
        number.clamp(1, cap.max(1) as i64) as u32
    }

    pub fn parity(&self, date: NaiveDate) -> WeekParity {
        week_parity(self.parity_reference, date)
    }
}

/// Week ordinal of `date` within its semester.
pub fn academic_week_number(calendar: &AcademicCalendar, date: NaiveDate) -> u32 {
    calendar.week_number(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_weeks_between_truncates() {
        assert_eq!(weeks_between(d(2025, 9, 1), d(2025, 9, 7)), 0);
        assert_eq!(weeks_between(d(2025, 9, 1), d(2025, 9, 8)), 1);
        assert_eq!(weeks_between(d(2025, 9, 1), d(2025, 9, 21)), 2);
        assert_eq!(weeks_between(d(2025, 9, 8), d(2025, 9, 2)), 0);
        assert_eq!(weeks_between(d(2025, 9, 8), d(2025, 9, 1)), -1);
    }

    #[test]
    fn test_parity_alternates() {
        let reference = d(2025, 9, 1);
        assert_eq!(week_parity(reference, d(2025, 9, 3)), WeekParity::Odd);
        assert_eq!(week_parity(reference, d(2025, 9, 10)), WeekParity::Even);
        assert_eq!(week_parity(reference, d(2025, 9, 15)), WeekParity::Odd);
        assert_eq!(WeekParity::Even.index(), 1);
    }

    #[test]
    fn test_parity_before_reference() {
        let reference = d(2025, 9, 1);
        assert_eq!(week_parity(reference, d(2025, 8, 25)), WeekParity::Even);
        assert_eq!(week_parity(reference, d(2025, 8, 18)), WeekParity::Odd);
    }

    #[test]
    fn test_parity_constant_within_week_before_reference() {
        let reference = d(2025, 9, 1);
        // Mon 2025-08-25 through Sun 2025-08-31.
        for day in 25..=31 {
            assert_eq!(week_parity(reference, d(2025, 8, day)), WeekParity::Even, "Aug {}", day);
        }
        assert_eq!(week_parity(reference, d(2025, 8, 24)), WeekParity::Odd);
        assert_eq!(week_parity(reference, d(2025, 8, 19)), WeekParity::Odd);
    }

    #[test]
    fn test_autumn_week_numbers() {
        let calendar = AcademicCalendar::default();
        assert_eq!(calendar.week_number(d(2025, 9, 1)), 1);
        assert_eq!(calendar.week_number(d(2025, 9, 8)), 2);
        assert_eq!(calendar.week_number(d(2025, 12, 15)), 16);
        assert_eq!(calendar.week_number(d(2025, 12, 29)), 17);
    }

    #[test]
    fn test_january_counts_from_previous_autumn_and_caps() {
        let calendar = AcademicCalendar::default();
        let (semester, start) = calendar.semester_of(d(2026, 1, 20));
        assert_eq!(semester, Semester::Autumn);
        assert_eq!(start, d(2025, 9, 1));
        assert_eq!(academic_week_number(&calendar, d(2026, 1, 20)), 17);
    }

    #[test]
    fn test_spring_week_numbers_and_cap() {
        let calendar = AcademicCalendar::default();
        assert_eq!(calendar.semester_of(d(2026, 2, 11)).0, Semester::Spring);
        assert_eq!(calendar.week_number(d(2026, 2, 11)), 1);
        assert_eq!(calendar.week_number(d(2026, 2, 18)), 2);
        assert_eq!(calendar.week_number(d(2026, 8, 20)), 20);
    }

    #[test]
    fn test_day_before_spring_is_autumn() {
        let calendar = AcademicCalendar::default();
        assert_eq!(calendar.semester_of(d(2026, 2, 10)).0, Semester::Autumn);
    }
}
