//! Timetable configuration file support.
//!
//! Reads the lesson grid, academic calendar and assembly preferences from a
//! TOML file. Every section is optional; omitted values fall back to the
//! built-in 16:20 grid and the calendar defaults.
//!
//! ```toml
//! [grid]
//! preset = "legacy_1600"
//!
//! [calendar]
//! parity_reference = "2025-09-01"
//! autumn_start = { month = 9, day = 1 }
//! spring_start = { month = 2, day = 11 }
//!
//! [assembly]
//! mode = "sparse"
//! unmatched = "unscheduled"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{BreakSlot, LessonSlot, Timetable};
use crate::services::academic_week::AcademicCalendar;
use crate::services::assembly::{AssemblyMode, AssemblyOptions, UnmatchedPolicy};

const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub calendar: CalendarSettings,
    #[serde(default)]
    pub assembly: AssemblySettings,
}

/// Built-in lesson grids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPreset {
    /// Fifth lesson at 16:20.
    #[default]
    Default,
    /// Fifth lesson at 16:00.
    #[serde(rename = "legacy_1600")]
    Legacy1600,
}

/// Lesson grid settings. Explicit `lessons`/`breaks` replace the preset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    #[serde(default)]
    pub preset: GridPreset,
    #[serde(default)]
    pub lessons: Vec<LessonSlotSettings>,
    #[serde(default)]
    pub breaks: Vec<BreakSlotSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSlotSettings {
    pub number: u8,
    /// "HH:MM"
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSlotSettings {
    pub number: u8,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub long: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSettings {
    #[serde(default = "default_parity_reference")]
    pub parity_reference: NaiveDate,
    #[serde(default = "default_autumn_start")]
    pub autumn_start: MonthDay,
    #[serde(default = "default_spring_start")]
    pub spring_start: MonthDay,
    #[serde(default = "default_autumn_max_weeks")]
    pub autumn_max_weeks: u32,
    #[serde(default = "default_spring_max_weeks")]
    pub spring_max_weeks: u32,
}

fn default_parity_reference() -> NaiveDate {
    AcademicCalendar::default().parity_reference
}

fn default_autumn_start() -> MonthDay {
    let (month, day) = AcademicCalendar::default().autumn_start;
    MonthDay { month, day }
}

fn default_spring_start() -> MonthDay {
    let (month, day) = AcademicCalendar::default().spring_start;
    MonthDay { month, day }
}

fn default_autumn_max_weeks() -> u32 {
    AcademicCalendar::default().autumn_max_weeks
}

fn default_spring_max_weeks() -> u32 {
    AcademicCalendar::default().spring_max_weeks
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            parity_reference: default_parity_reference(),
            autumn_start: default_autumn_start(),
            spring_start: default_spring_start(),
            autumn_max_weeks: default_autumn_max_weeks(),
            spring_max_weeks: default_spring_max_weeks(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblySettings {
    #[serde(default)]
    pub mode: AssemblyMode,
    #[serde(default)]
    pub unmatched: UnmatchedPolicy,
}

fn parse_time(field: &str, value: &str) -> ScheduleResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|e| {
        ScheduleError::configuration(format!("{} '{}' is not HH:MM: {}", field, value, e))
    })
}

fn check_month_day(field: &str, md: MonthDay) -> ScheduleResult<(u32, u32)> {
    // 2024 is a leap year, so Feb 29 passes.
    if NaiveDate::from_ymd_opt(2024, md.month, md.day).is_none() {
        return Err(ScheduleError::configuration(format!(
            "{} {}-{} is not a calendar day",
            field, md.month, md.day
        )));
    }
    Ok((md.month, md.day))
}

impl TimetableConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScheduleError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loading timetable config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ScheduleResult<Self> {
        toml::from_str(content).map_err(|e| {
            ScheduleError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `timetable.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> ScheduleResult<Self> {
        let search_paths = [
            PathBuf::from("timetable.toml"),
            PathBuf::from("backend/timetable.toml"),
            PathBuf::from("../timetable.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ScheduleError::configuration(
            "No timetable.toml found in standard locations",
        ))
    }

    /// Build the configured lesson grid.
    pub fn timetable(&self) -> ScheduleResult<Timetable> {
        let grid = &self.grid;
        if grid.lessons.is_empty() && grid.breaks.is_empty() {
            return Ok(match grid.preset {
                GridPreset::Default => Timetable::default(),
                GridPreset::Legacy1600 => Timetable::legacy_1600(),
            });
        }

        let lessons = grid
            .lessons
            .iter()
            .map(|l| {
                Ok(LessonSlot::new(
                    l.number,
                    parse_time("lesson start", &l.start)?,
                    parse_time("lesson end", &l.end)?,
                ))
            })
            .collect::<ScheduleResult<Vec<_>>>()?;
        let breaks = grid
            .breaks
            .iter()
            .map(|b| {
                Ok(BreakSlot::new(
                    b.number,
                    parse_time("break start", &b.start)?,
                    parse_time("break end", &b.end)?,
                    b.long,
                ))
            })
            .collect::<ScheduleResult<Vec<_>>>()?;

        Timetable::new(lessons, breaks)
            .map_err(|e| ScheduleError::configuration(format!("Invalid [grid]: {}", e)))
    }

    pub fn calendar(&self) -> ScheduleResult<AcademicCalendar> {
        let cal = &self.calendar;
        if cal.autumn_max_weeks == 0 || cal.spring_max_weeks == 0 {
            return Err(ScheduleError::configuration(
                "semester week caps must be at least 1",
            ));
        }
        Ok(AcademicCalendar {
            parity_reference: cal.parity_reference,
            autumn_start: check_month_day("autumn_start", cal.autumn_start)?,
            spring_start: check_month_day("spring_start", cal.spring_start)?,
            autumn_max_weeks: cal.autumn_max_weeks,
            spring_max_weeks: cal.spring_max_weeks,
        })
    }

    pub fn options(&self) -> AssemblyOptions {
        AssemblyOptions::new(self.assembly.mode, self.assembly.unmatched)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TimetableConfig::from_toml_str("").unwrap();
        assert_eq!(config.timetable().unwrap(), Timetable::default());
        assert_eq!(config.calendar().unwrap(), AcademicCalendar::default());
        assert_eq!(config.options(), AssemblyOptions::default());
    }

    #[test]
    fn test_legacy_preset_and_assembly() {
        let toml = r#"
[grid]
preset = "legacy_1600"

[assembly]
mode = "sparse"
unmatched = "unscheduled"
"#;
        let config = TimetableConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.timetable().unwrap(), Timetable::legacy_1600());
        assert_eq!(
            config.options(),
            AssemblyOptions::new(AssemblyMode::Sparse, UnmatchedPolicy::Unscheduled)
        );
    }

    #[test]
    fn test_explicit_grid() {
        let toml = r#"
[[grid.lessons]]
number = 1
start = "08:30"
end = "10:00"

[[grid.lessons]]
number = 2
start = "10:15"
end = "11:45"

[[grid.breaks]]
number = 1
start = "10:00"
end = "10:15"
"#;
        let grid = TimetableConfig::from_toml_str(toml).unwrap().timetable().unwrap();
        assert_eq!(grid.lessons().len(), 2);
        assert_eq!(
            grid.lesson_slot(2).unwrap().start,
            NaiveTime::from_hms_opt(10, 15, 0).unwrap()
        );
        assert!(!grid.breaks()[0].is_long);
    }

    #[test]
    fn test_bad_time_is_configuration_error() {
        let toml = r#"
[[grid.lessons]]
number = 1
start = "8.30"
end = "10:00"
"#;
        let err = TimetableConfig::from_toml_str(toml)
            .unwrap()
            .timetable()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
        assert!(err.to_string().contains("8.30"));
    }

    #[test]
    fn test_inconsistent_grid_is_rejected() {
        let toml = r#"
[[grid.lessons]]
number = 1
start = "08:30"
end = "10:00"

[[grid.lessons]]
number = 2
start = "10:15"
end = "11:45"
"#;
        let err = TimetableConfig::from_toml_str(toml)
            .unwrap()
            .timetable()
            .unwrap_err();
        assert!(err.to_string().contains("[grid]"));
    }

    #[test]
    fn test_calendar_overrides_and_validation() {
        let toml = r#"
[calendar]
parity_reference = "2026-09-01"
spring_start = { month = 2, day = 9 }
spring_max_weeks = 18
"#;
        let cal = TimetableConfig::from_toml_str(toml).unwrap().calendar().unwrap();
        assert_eq!(cal.parity_reference, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!(cal.spring_start, (2, 9));
        assert_eq!(cal.autumn_start, (9, 1));
        assert_eq!(cal.spring_max_weeks, 18);

        let bad = TimetableConfig::from_toml_str("[calendar]\nautumn_start = { month = 13, day = 1 }")
            .unwrap();
        assert!(bad.calendar().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[assembly]\nmode = \"sparse\"").unwrap();
        let config = TimetableConfig::from_file(file.path()).unwrap();
        assert_eq!(config.assembly.mode, AssemblyMode::Sparse);
    }

    #[test]
    fn test_unreadable_or_invalid_file() {
        assert!(TimetableConfig::from_file("/nonexistent/timetable.toml").is_err());
        assert!(TimetableConfig::from_toml_str("[assembly]\nmode = 3").is_err());
    }
}
