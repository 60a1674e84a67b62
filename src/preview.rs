//! Settings schema and live previews shown by `zk-journal settings`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::{SettingKey, Settings};
use crate::date_fmt::{self, iso_weekday};
use crate::error::FormatError;
use crate::generator::date_range;
use crate::paths::build_file_path;

pub const INVALID_FORMAT: &str = "Invalid format";

pub const COMMON_PATTERNS: &str = "\
Common format patterns:
  YYYY-MM-DD       2026-01-06      (daily notes)
  YYYY/MM/DD       2026/01/06      (daily notes, nested folders)
  YYYY.MM.DD       2026.01.06      (daily notes)
  YYYYMMDD         20260106        (daily notes)
  GGGG-[W]W        2026-W2         (weekly notes)
  GGGG - [Week] W  2026 - Week 2   (weekly notes)
  MMMM Do          January 6th     (date ranges)
  MMM D            Jan 6           (date ranges)

Use GGGG (ISO week year) instead of YYYY in weekly formats so that weeks
spanning New Year get the right year.";

#[derive(Debug, Clone, Serialize)]
pub struct FieldPreview {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub preview: Option<String>,
}

struct FieldSpec {
    key: SettingKey,
    id: &'static str,
    name: &'static str,
    description: &'static str,
    placeholder: &'static str,
}

const FIELDS: [FieldSpec; 5] = [
    FieldSpec {
        key: SettingKey::DailyNotesFolder,
        id: "dailyNotesFolder",
        name: "Daily notes folder",
        description: "Folder for daily notes, relative to the vault root (empty = root)",
        placeholder: "Journal/Daily",
    },
    FieldSpec {
        key: SettingKey::WeeklyNotesFolder,
        id: "weeklyNotesFolder",
        name: "Weekly notes folder",
        description: "Folder for weekly notes, relative to the vault root (empty = root)",
        placeholder: "Journal/Weekly",
    },
    FieldSpec {
        key: SettingKey::DailyNoteFormat,
        id: "dailyNoteFormat",
        name: "Daily note filename format",
        description: "Format for daily note filenames and links (e.g., YYYY-MM-DD)",
        placeholder: "YYYY-MM-DD",
    },
    FieldSpec {
        key: SettingKey::WeeklyNoteFormat,
        id: "weeklyNoteFormat",
        name: "Weekly note filename format",
        description: "Format for weekly note filenames and links (W = ISO week number, GGGG = ISO week year, [text] = literal text)",
        placeholder: "GGGG - [Week] W",
    },
    FieldSpec {
        key: SettingKey::WeeklyDateRangeFormat,
        id: "weeklyDateRangeFormat",
        name: "Weekly note date range format",
        description: "Format for the date range shown in weekly notes (e.g., MMMM Do)",
        placeholder: "MMMM Do",
    },
];

/// Render `pattern` for `now`, or the invalid-format placeholder.
pub fn preview_format(now: &NaiveDateTime, pattern: &str) -> String {
    date_fmt::format(now, pattern).unwrap_or_else(|_| INVALID_FORMAT.to_string())
}

/// The range line a weekly note for `now` would carry.
pub fn preview_range(now: NaiveDateTime, pattern: &str) -> String {
    let render = || -> Result<String, FormatError> { date_range(iso_weekday(now, 1)?, pattern) };
    render().unwrap_or_else(|_| INVALID_FORMAT.to_string())
}

/// Where a note for `now` would land inside `folder`.
pub fn preview_path(now: &NaiveDateTime, folder: &str, pattern: &str) -> String {
    match date_fmt::format(now, pattern) {
        Ok(name) => format!("Example path: {}", build_file_path(folder, &name)),
        Err(_) => INVALID_FORMAT.to_string(),
    }
}

pub fn settings_panel(settings: &Settings, now: NaiveDateTime) -> Vec<FieldPreview> {
    FIELDS
        .iter()
        .map(|field| {
            let value = settings.get(field.key).to_string();
            let preview = match field.key {
                SettingKey::DailyNotesFolder => {
                    Some(preview_path(&now, &value, &settings.daily_note_format))
                }
                SettingKey::WeeklyNotesFolder => {
                    Some(preview_path(&now, &value, &settings.weekly_note_format))
                }
                SettingKey::DailyNoteFormat | SettingKey::WeeklyNoteFormat => {
                    Some(preview_format(&now, &value))
                }
                SettingKey::WeeklyDateRangeFormat => Some(preview_range(now, &value)),
            };
            FieldPreview {
                key: field.id,
                name: field.name,
                description: field.description,
                placeholder: field.placeholder,
                value,
                preview,
            }
        })
        .collect()
}
