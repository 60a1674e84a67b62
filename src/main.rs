mod cli;
mod commands;
mod config;
mod date_fmt;
mod error;
mod generator;
mod host;
mod paths;
mod preview;
mod writer;

use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cli::{Cli, Command, NoteArgs, SettingsCommand};
use config::{JournalConfig, Settings};
use generator::NoteKind;
use host::{FsVault, Opener, StderrNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Tracing writes to stderr (stdout carries note paths and previews)
    fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ZK_JOURNAL_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = JournalConfig::resolve(cli.vault);
    let settings = config::load_settings(&config.settings_file).await?;

    match cli.command {
        Command::Daily(args) => Ok(run_note(NoteKind::Daily, &config, &settings, args).await),
        Command::Weekly(args) => Ok(run_note(NoteKind::Weekly, &config, &settings, args).await),
        Command::Preview { date } => {
            let now = reference_date(date);
            println!("Daily:  {}", preview::preview_format(&now, &settings.daily_note_format));
            println!("Weekly: {}", preview::preview_format(&now, &settings.weekly_note_format));
            println!("Range:  {}", preview::preview_range(now, &settings.weekly_date_range_format));
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings(SettingsCommand::Show { json }) => {
            print_settings(&settings, json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Settings(SettingsCommand::Set { key, value }) => {
            let settings = settings.with_value(key, value);
            config::save_settings(&config.settings_file, &settings).await?;
            info!("saved {}", config.settings_file.display());
            print_settings(&settings, false)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The instant every derived date of one invocation is computed from.
fn reference_date(date: Option<NaiveDate>) -> NaiveDateTime {
    match date {
        Some(d) => d.and_time(NaiveTime::default()),
        None => Local::now().naive_local(),
    }
}

async fn run_note(
    kind: NoteKind,
    config: &JournalConfig,
    settings: &Settings,
    args: NoteArgs,
) -> ExitCode {
    let opener = if args.open { Opener::from_env() } else { Opener::Print };
    let vault = FsVault::new(config.root.clone(), opener);
    let reference = reference_date(args.date);

    if commands::run_note_command(kind, &vault, &StderrNotifier, settings, reference).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_settings(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let panel = preview::settings_panel(settings, Local::now().naive_local());
    if json {
        println!("{}", serde_json::to_string_pretty(&panel).context("serializing settings")?);
        return Ok(());
    }
    for field in panel {
        println!("{} ({})", field.name, field.key);
        println!("  {}", field.description);
        if field.value.is_empty() {
            println!("  value:   (empty, e.g. {})", field.placeholder);
        } else {
            println!("  value:   {}", field.value);
        }
        if let Some(preview) = field.preview {
            println!("  preview: {preview}");
        }
    }
    Ok(())
}
