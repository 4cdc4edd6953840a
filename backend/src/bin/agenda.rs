//! Timetable agenda tool.
//!
//! Prints the assembled day, a multi-day agenda or academic week information
//! as JSON, reading entries from a server JSON export or an `.ics` feed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin timetable-agenda --features cli -- \
//!     day --file schedule.json --date 2025-09-08
//!
//! cargo run --bin timetable-agenda --features cli -- \
//!     agenda --file feed.ics --start 2025-09-08 --days 14 --sparse
//!
//! cargo run --bin timetable-agenda --features cli -- week --date 2025-10-20
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use timetable::models::ScheduleEntry;
use timetable::parsing::{parse_icalendar_file, parse_schedule_json};
use timetable::services::{
    build_agenda, AcademicCalendar, AssemblyMode, AssemblyOptions, Semester, UnmatchedPolicy,
    ViewState, WeekParity,
};
use timetable::{Timetable, TimetableConfig};

#[derive(Parser)]
#[command(name = "timetable-agenda")]
#[command(about = "Resolve class schedules into daily agendas")]
struct Cli {
    /// Configuration file (default: timetable.toml in the standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnmatchedArg {
    Drop,
    Reject,
    Unscheduled,
}

impl From<UnmatchedArg> for UnmatchedPolicy {
    fn from(arg: UnmatchedArg) -> Self {
        match arg {
            UnmatchedArg::Drop => UnmatchedPolicy::Drop,
            UnmatchedArg::Reject => UnmatchedPolicy::Reject,
            UnmatchedArg::Unscheduled => UnmatchedPolicy::Unscheduled,
        }
    }
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Schedule export: `.ics` feed or server JSON
    #[arg(long)]
    file: PathBuf,

    /// Keep only entries attended by this group
    #[arg(long)]
    group: Option<String>,

    /// Lessons only, without empty slots
    #[arg(long)]
    sparse: bool,

    /// Handling of entries off the lesson grid (dense layout only)
    #[arg(long, value_enum)]
    unmatched: Option<UnmatchedArg>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a single day
    Day {
        #[command(flatten)]
        source: SourceArgs,

        /// Date to resolve (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },

    /// Assemble consecutive days
    Agenda {
        #[command(flatten)]
        source: SourceArgs,

        /// First day (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        #[arg(long, default_value_t = timetable::services::DEFAULT_AGENDA_DAYS)]
        days: u32,
    },

    /// Show the academic week of a date
    Week {
        #[arg(long)]
        date: NaiveDate,
    },
}

#[derive(Serialize)]
struct WeekInfo {
    date: NaiveDate,
    semester: Semester,
    semester_start: NaiveDate,
    week_number: u32,
    parity: WeekParity,
}

fn load_config(path: Option<&Path>) -> Result<TimetableConfig> {
    match path {
        Some(path) => TimetableConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(TimetableConfig::from_default_location().unwrap_or_else(|e| {
            info!("Using built-in configuration ({})", e);
            TimetableConfig::default()
        })),
    }
}

fn load_entries(source: &SourceArgs) -> Result<Vec<ScheduleEntry>> {
    let is_ics = source
        .file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ics"));
    let entries = if is_ics {
        parse_icalendar_file(&source.file)?
    } else {
        parse_schedule_json(&source.file)?
    };

    let entries: Vec<ScheduleEntry> = match source.group.as_deref() {
        Some(group) => entries
            .into_iter()
            .filter(|e| e.groups.is_empty() || e.groups.iter().any(|g| g == group))
            .collect(),
        None => entries,
    };
    info!("Loaded {} entries from {}", entries.len(), source.file.display());
    Ok(entries)
}

fn options_for(config: &TimetableConfig, source: &SourceArgs) -> AssemblyOptions {
    let mut options = config.options();
    if source.sparse {
        options.mode = AssemblyMode::Sparse;
    }
    if let Some(unmatched) = source.unmatched {
        options.unmatched = unmatched.into();
    }
    options
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let grid: Timetable = config.timetable()?;
    let calendar: AcademicCalendar = config.calendar()?;

    match cli.command {
        Command::Day { source, date } => {
            let entries = load_entries(&source)?;
            let options = options_for(&config, &source);
            let mut view = ViewState::new(date, source.group.clone().unwrap_or_default())
                .with_show_empty_lessons(options.mode == AssemblyMode::Dense);
            view.unmatched = options.unmatched;
            let day = view.day(&entries, &grid)?;
            info!(
                "{}: week {} ({:?})",
                date,
                view.week_number(&calendar),
                view.week_parity(&calendar)
            );
            print_json(&day)
        }
        Command::Agenda {
            source,
            start,
            days,
        } => {
            let entries = load_entries(&source)?;
            let agenda = build_agenda(&entries, &grid, start, days, options_for(&config, &source))?;
            info!(
                "{} of {} days have lessons",
                agenda.days_with_lessons().count(),
                agenda.days.len()
            );
            print_json(&agenda)
        }
        Command::Week { date } => {
            let (semester, semester_start) = calendar.semester_of(date);
            print_json(&WeekInfo {
                date,
                semester,
                semester_start,
                week_number: calendar.week_number(date),
                parity: calendar.parity(date),
            })
        }
    }
}
