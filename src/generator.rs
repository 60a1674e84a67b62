//! Renders daily and weekly note bodies from a reference date.
//!
//! Every date used here is derived from the single reference date passed in,
//! so generation is a pure function of `(reference, settings)`.

use std::fmt;

use chrono::{Datelike, NaiveDateTime};

use crate::config::Settings;
use crate::date_fmt::{self, add_days, add_weeks, iso_weekday};
use crate::error::{ContentGenerationError, FormatError};
use crate::paths::{build_file_path, build_link_path};

const DAILY_HEADING_FORMAT: &str = "dddd MMMM Do, YYYY";

const ISO_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Daily,
    Weekly,
}

impl NoteKind {
    /// Capitalized form for user notices.
    pub fn title(self) -> &'static str {
        match self {
            NoteKind::Daily => "Daily",
            NoteKind::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoteKind::Daily => "daily",
            NoteKind::Weekly => "weekly",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNote {
    pub kind: NoteKind,
    pub file_path: String,
    pub body: String,
}

pub fn generate(
    kind: NoteKind,
    reference: NaiveDateTime,
    settings: &Settings,
) -> Result<GeneratedNote, ContentGenerationError> {
    let wrap = |source: FormatError| ContentGenerationError { kind, source };

    let (file_format, body) = match kind {
        NoteKind::Daily => (
            &settings.daily_note_format,
            daily_body(reference, settings).map_err(wrap)?,
        ),
        NoteKind::Weekly => (
            &settings.weekly_note_format,
            weekly_body(reference, settings).map_err(wrap)?,
        ),
    };
    let file_name = date_fmt::format(&reference, file_format).map_err(wrap)?;

    Ok(GeneratedNote {
        kind,
        file_path: build_file_path(settings.folder_for(kind), &file_name),
        body,
    })
}

fn daily_link(date: NaiveDateTime, settings: &Settings) -> Result<String, FormatError> {
    let name = date_fmt::format(&date, &settings.daily_note_format)?;
    Ok(build_link_path(&settings.daily_notes_folder, &name))
}

fn weekly_link(date: NaiveDateTime, settings: &Settings) -> Result<String, FormatError> {
    let name = date_fmt::format(&date, &settings.weekly_note_format)?;
    Ok(build_link_path(&settings.weekly_notes_folder, &name))
}

pub fn daily_body(reference: NaiveDateTime, settings: &Settings) -> Result<String, FormatError> {
    let formatted_date = date_fmt::format(&reference, DAILY_HEADING_FORMAT)?;
    // The week link names the reference date itself, not its ISO Monday
    let week = weekly_link(reference, settings)?;
    let yesterday = daily_link(add_days(reference, -1)?, settings)?;
    let tomorrow = daily_link(add_days(reference, 1)?, settings)?;

    Ok(format!(
        "*{formatted_date}*\n\
         \n\
         Week - [[{week}]]\n\
         Yesterday - [[{yesterday}]]\n\
         Tomorrow - [[{tomorrow}]]\n\
         \n\
         ---\n\
         \n"
    ))
}

pub fn weekly_body(reference: NaiveDateTime, settings: &Settings) -> Result<String, FormatError> {
    let week_start = iso_weekday(reference, 1)?;
    let date_range = date_range(week_start, &settings.weekly_date_range_format)?;

    let day_lines = ISO_WEEKDAYS
        .iter()
        .zip(0i64..)
        .map(|(name, offset)| {
            let link = daily_link(add_days(week_start, offset)?, settings)?;
            Ok(format!("{name} - [[{link}]]"))
        })
        .collect::<Result<Vec<_>, FormatError>>()?
        .join("\n");

    // Neighbouring weeks are offset from the reference date, not week_start
    let last_week = weekly_link(add_weeks(reference, -1)?, settings)?;
    let next_week = weekly_link(add_weeks(reference, 1)?, settings)?;

    Ok(format!(
        "*{date_range}*\n\
         \n\
         Last week - [[{last_week}]]\n\
         \n\
         {day_lines}\n\
         \n\
         Next week - [[{next_week}]]\n\
         \n\
         ---\n\
         \n"
    ))
}

/// `"<start> - <end>"` for the ISO week beginning at `week_start`.
///
/// Within one month the end date is rendered with only the last
/// whitespace-delimited token of `pattern` (`"MMMM Do"` → `"Do"`), or the whole
/// pattern when it has no whitespace.
pub fn date_range(week_start: NaiveDateTime, pattern: &str) -> Result<String, FormatError> {
    let week_end = add_days(week_start, 6)?;
    let end_pattern = if week_start.month() == week_end.month() {
        end_token(pattern)
    } else {
        pattern
    };
    Ok(format!(
        "{} - {}",
        date_fmt::format(&week_start, pattern)?,
        date_fmt::format(&week_end, end_pattern)?
    ))
}

fn end_token(pattern: &str) -> &str {
    pattern.split_whitespace().last().unwrap_or(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingKey;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_daily_note_default_settings() {
        let note = generate(NoteKind::Daily, at(2026, 1, 6), &Settings::default()).unwrap();
        assert_eq!(note.file_path, "2026-01-06.md");
        assert_eq!(
            note.body,
            "*Tuesday January 6th, 2026*\n\
             \n\
             Week - [[2026 - Week 2]]\n\
             Yesterday - [[2026-01-05]]\n\
             Tomorrow - [[2026-01-07]]\n\
             \n\
             ---\n\
             \n"
        );
    }

    #[test]
    fn test_weekly_note_default_settings() {
        let note = generate(NoteKind::Weekly, at(2026, 1, 6), &Settings::default()).unwrap();
        assert_eq!(note.file_path, "2026 - Week 2.md");
        assert_eq!(
            note.body,
            "*January 5th - 11th*\n\
             \n\
             Last week - [[2026 - Week 1]]\n\
             \n\
             Monday - [[2026-01-05]]\n\
             Tuesday - [[2026-01-06]]\n\
             Wednesday - [[2026-01-07]]\n\
             Thursday - [[2026-01-08]]\n\
             Friday - [[2026-01-09]]\n\
             Saturday - [[2026-01-10]]\n\
             Sunday - [[2026-01-11]]\n\
             \n\
             Next week - [[2026 - Week 3]]\n\
             \n\
             ---\n\
             \n"
        );
    }

    #[test]
    fn test_links_carry_folders() {
        let settings = Settings::default()
            .with_value(SettingKey::DailyNotesFolder, "Journal/Daily".into())
            .with_value(SettingKey::WeeklyNotesFolder, "Journal/Weekly".into());

        let daily = generate(NoteKind::Daily, at(2026, 1, 6), &settings).unwrap();
        assert_eq!(daily.file_path, "Journal/Daily/2026-01-06.md");
        assert!(daily.body.contains("Week - [[Journal/Weekly/2026 - Week 2]]"));
        assert!(daily.body.contains("Yesterday - [[Journal/Daily/2026-01-05]]"));

        let weekly = generate(NoteKind::Weekly, at(2026, 1, 6), &settings).unwrap();
        assert_eq!(weekly.file_path, "Journal/Weekly/2026 - Week 2.md");
        assert!(weekly.body.contains("Sunday - [[Journal/Daily/2026-01-11]]"));
        assert!(weekly.body.contains("Next week - [[Journal/Weekly/2026 - Week 3]]"));
    }

    #[test]
    fn test_cross_month_range_uses_full_pattern() {
        // Week of Monday 2023-01-30 ends Sunday 2023-02-05
        let range = date_range(at(2023, 1, 30), "MMMM Do").unwrap();
        assert_eq!(range, "January 30th - February 5th");

        let note = generate(NoteKind::Weekly, at(2023, 2, 1), &Settings::default()).unwrap();
        assert!(note.body.starts_with("*January 30th - February 5th*\n"));
    }

    #[test]
    fn test_same_month_range_end_token() {
        let monday = at(2026, 1, 5);
        assert_eq!(date_range(monday, "Do").unwrap(), "5th - 11th");
        assert_eq!(date_range(monday, "MMM D").unwrap(), "Jan 5 - 11");
        assert_eq!(date_range(monday, "MMMM [the] Do").unwrap(), "January the 5th - 11th");
        assert_eq!(date_range(monday, "D MMMM").unwrap(), "5 January - January");
    }

    #[test]
    fn test_weekday_order_is_monday_first() {
        for day in 5..=11 {
            let body = weekly_body(at(2026, 1, day), &Settings::default()).unwrap();
            let names: Vec<&str> = body
                .lines()
                .filter_map(|l| l.split_once(" - [[").map(|(name, _)| name))
                .filter(|name| ISO_WEEKDAYS.contains(name))
                .collect();
            assert_eq!(names, ISO_WEEKDAYS);
            assert!(body.contains("Monday - [[2026-01-05]]"));
        }
    }

    #[test]
    fn test_neighbour_weeks_offset_from_reference_date() {
        // Sunday 2026-01-04 is in ISO week 1; one week back is 2025-12-28 (week 52)
        let body = weekly_body(at(2026, 1, 4), &Settings::default()).unwrap();
        assert!(body.contains("Last week - [[2025 - Week 52]]"));
        assert!(body.contains("Next week - [[2026 - Week 2]]"));
        assert!(body.contains("Monday - [[2025-12-29]]"));
    }

    #[test]
    fn test_weekly_note_spanning_new_year() {
        // Wednesday 2025-12-31 belongs to ISO week 1 of 2026
        let note = generate(NoteKind::Weekly, at(2025, 12, 31), &Settings::default()).unwrap();
        assert_eq!(note.file_path, "2026 - Week 1.md");
        assert!(note.body.starts_with("*December 29th - January 4th*\n"));
        assert!(note.body.contains("Monday - [[2025-12-29]]"));
        assert!(note.body.contains("Wednesday - [[2025-12-31]]"));
        assert!(note.body.contains("Thursday - [[2026-01-01]]"));
        assert!(note.body.contains("Sunday - [[2026-01-04]]"));
        assert!(note.body.contains("Last week - [[2025 - Week 52]]"));
        assert!(note.body.contains("Next week - [[2026 - Week 2]]"));
    }

    #[test]
    fn test_week_link_uses_reference_date_across_year_boundary() {
        let body = daily_body(at(2024, 12, 30), &Settings::default()).unwrap();
        assert!(body.contains("Week - [[2025 - Week 1]]"));
        assert!(body.contains("Yesterday - [[2024-12-29]]"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let settings = Settings::default();
        for kind in [NoteKind::Daily, NoteKind::Weekly] {
            let first = generate(kind, at(2026, 7, 19), &settings).unwrap();
            let second = generate(kind, at(2026, 7, 19), &settings).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_bad_format_is_wrapped() {
        let settings =
            Settings::default().with_value(SettingKey::DailyNoteFormat, "YYYY [oops".into());
        let err = generate(NoteKind::Daily, at(2026, 1, 6), &settings).unwrap_err();
        assert_eq!(err.kind, NoteKind::Daily);
        assert!(matches!(err.source, FormatError::UnterminatedLiteral { .. }));

        // The weekly body also renders daily links, so it fails the same way
        let err = generate(NoteKind::Weekly, at(2026, 1, 6), &settings).unwrap_err();
        assert_eq!(err.kind, NoteKind::Weekly);
    }
}
