use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::generator::NoteKind;

pub const SETTINGS_FILE_NAME: &str = ".zk-journal.toml";

#[derive(Debug, Clone)]
pub struct JournalConfig {
    pub root: PathBuf,
    pub settings_file: PathBuf,
}

impl JournalConfig {
    /// Resolution order: CLI flag → VAULT_ROOT env → ~/vault fallback
    pub fn resolve(cli_root: Option<PathBuf>) -> Self {
        let root = cli_root
            .or_else(|| std::env::var("VAULT_ROOT").ok().map(PathBuf::from))
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("vault")
            });
        Self::from_root(root)
    }

    pub fn from_root(root: PathBuf) -> Self {
        let settings_file = root.join(SETTINGS_FILE_NAME);
        JournalConfig { root, settings_file }
    }
}

/// Validated note settings. Format fields are never blank and folders carry no
/// leading or trailing separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub daily_notes_folder: String,
    pub weekly_notes_folder: String,
    pub daily_note_format: String,
    pub weekly_note_format: String,
    pub weekly_date_range_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            daily_notes_folder: String::new(),
            weekly_notes_folder: String::new(),
            daily_note_format: "YYYY-MM-DD".into(),
            weekly_note_format: "GGGG - [Week] W".into(),
            weekly_date_range_format: "MMMM Do".into(),
        }
    }
}

/// Settings as persisted. Missing keys are `None`; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSettings {
    pub daily_notes_folder: Option<String>,
    pub weekly_notes_folder: Option<String>,
    pub daily_note_format: Option<String>,
    pub weekly_note_format: Option<String>,
    pub weekly_date_range_format: Option<String>,
}

impl From<Settings> for RawSettings {
    fn from(s: Settings) -> Self {
        RawSettings {
            daily_notes_folder: Some(s.daily_notes_folder),
            weekly_notes_folder: Some(s.weekly_notes_folder),
            daily_note_format: Some(s.daily_note_format),
            weekly_note_format: Some(s.weekly_note_format),
            weekly_date_range_format: Some(s.weekly_date_range_format),
        }
    }
}

impl Settings {
    /// Merge `raw` over `defaults`, then sanitize. Never fails.
    pub fn validate(raw: RawSettings, defaults: &Settings) -> Settings {
        Settings {
            daily_notes_folder: sanitize_folder(
                raw.daily_notes_folder
                    .as_deref()
                    .unwrap_or(&defaults.daily_notes_folder),
            ),
            weekly_notes_folder: sanitize_folder(
                raw.weekly_notes_folder
                    .as_deref()
                    .unwrap_or(&defaults.weekly_notes_folder),
            ),
            daily_note_format: non_blank_or(raw.daily_note_format, &defaults.daily_note_format),
            weekly_note_format: non_blank_or(raw.weekly_note_format, &defaults.weekly_note_format),
            weekly_date_range_format: non_blank_or(
                raw.weekly_date_range_format,
                &defaults.weekly_date_range_format,
            ),
        }
    }

    pub fn folder_for(&self, kind: NoteKind) -> &str {
        match kind {
            NoteKind::Daily => &self.daily_notes_folder,
            NoteKind::Weekly => &self.weekly_notes_folder,
        }
    }

    /// Set one field by key, then re-validate the whole record.
    pub fn with_value(self, key: SettingKey, value: String) -> Settings {
        let mut raw = RawSettings::from(self);
        let slot = match key {
            SettingKey::DailyNotesFolder => &mut raw.daily_notes_folder,
            SettingKey::WeeklyNotesFolder => &mut raw.weekly_notes_folder,
            SettingKey::DailyNoteFormat => &mut raw.daily_note_format,
            SettingKey::WeeklyNoteFormat => &mut raw.weekly_note_format,
            SettingKey::WeeklyDateRangeFormat => &mut raw.weekly_date_range_format,
        };
        *slot = Some(value);
        Settings::validate(raw, &Settings::default())
    }

    pub fn get(&self, key: SettingKey) -> &str {
        match key {
            SettingKey::DailyNotesFolder => &self.daily_notes_folder,
            SettingKey::WeeklyNotesFolder => &self.weekly_notes_folder,
            SettingKey::DailyNoteFormat => &self.daily_note_format,
            SettingKey::WeeklyNoteFormat => &self.weekly_note_format,
            SettingKey::WeeklyDateRangeFormat => &self.weekly_date_range_format,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingKey {
    DailyNotesFolder,
    WeeklyNotesFolder,
    DailyNoteFormat,
    WeeklyNoteFormat,
    WeeklyDateRangeFormat,
}

fn non_blank_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

fn sanitize_folder(folder: &str) -> String {
    folder
        .trim()
        .trim_matches(|c| c == '/' || c == '\\')
        .to_string()
}

/// Load and validate settings. A missing file yields the defaults.
pub async fn load_settings(path: &Path) -> Result<Settings> {
    let raw = match fs::read_to_string(path).await {
        Ok(text) => toml::from_str::<RawSettings>(&text)
            .with_context(|| format!("parsing settings {}", path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no settings file at {}, using defaults", path.display());
            RawSettings::default()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("reading settings {}", path.display()));
        }
    };
    Ok(Settings::validate(raw, &Settings::default()))
}

pub async fn save_settings(path: &Path, settings: &Settings) -> Result<()> {
    let text = toml::to_string_pretty(settings).context("serializing settings")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, text)
        .await
        .with_context(|| format!("writing settings {}", path.display()))
}
