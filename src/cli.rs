use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::SettingKey;
use crate::preview::COMMON_PATTERNS;

#[derive(Parser)]
#[command(name = "zk-journal", about = "Daily and weekly notes with cross-linked templates")]
pub struct Cli {
    /// Path to vault root (overrides VAULT_ROOT env and ~/vault default)
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create today's daily note, or prepend the template to it
    Daily(NoteArgs),
    /// Create this week's note, or prepend the template to it
    Weekly(NoteArgs),
    /// Show what the configured formats render to
    #[command(after_help = COMMON_PATTERNS)]
    Preview {
        /// Reference date (YYYY-MM-DD) instead of now
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Inspect or change settings
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Args)]
pub struct NoteArgs {
    /// Reference date (YYYY-MM-DD) instead of now
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Open the note in $VISUAL / $EDITOR instead of printing its path
    #[arg(long)]
    pub open: bool,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print every setting with its live preview
    Show {
        #[arg(long)]
        json: bool,
    },
    /// Set one setting and save
    Set {
        #[arg(value_enum)]
        key: SettingKey,
        value: String,
    },
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
