use chrono::NaiveDateTime;
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::error::{FolderCreationError, JournalError};
use crate::generator::{self, NoteKind};
use crate::host::{Notifier, Vault};
use crate::paths::normalize_path;
use crate::writer::{write_note, WriteAction, WriteOutcome};

const FAILURE_HINT: &str = "The file may be open in another program or the format may be invalid.";

/// Create the note of `kind` for `reference`, or prepend to it if it exists.
pub async fn create_note<V, N>(
    kind: NoteKind,
    vault: &V,
    notifier: &N,
    settings: &Settings,
    reference: NaiveDateTime,
) -> Result<WriteOutcome, JournalError>
where
    V: Vault + ?Sized,
    N: Notifier + ?Sized,
{
    ensure_folder(vault, settings.folder_for(kind)).await?;

    let note = generator::generate(kind, reference, settings)?;
    debug!("generated {kind} note for {reference} at {}", note.file_path);

    let outcome = write_note(vault, &note).await?;
    notifier.notify(&match outcome.action {
        WriteAction::Created => format!("{} note created", kind.title()),
        WriteAction::Prepended => {
            format!("{} note template added to existing file", kind.title())
        }
    });
    if let Some(e) = &outcome.open_error {
        notifier.notify(&format!(
            "{} note written but could not be opened: {e}",
            kind.title()
        ));
    }

    Ok(outcome)
}

/// Command boundary: runs [`create_note`] and turns any failure into a log
/// entry plus one notice. Returns whether the note was written.
pub async fn run_note_command<V, N>(
    kind: NoteKind,
    vault: &V,
    notifier: &N,
    settings: &Settings,
    reference: NaiveDateTime,
) -> bool
where
    V: Vault + ?Sized,
    N: Notifier + ?Sized,
{
    match create_note(kind, vault, notifier, settings, reference).await {
        Ok(_) => true,
        Err(e) => {
            error!("creating {kind} note: {:#}", anyhow::Error::new(e));
            notifier.notify(&format!("Failed to create {kind} note. {FAILURE_HINT}"));
            false
        }
    }
}

async fn ensure_folder<V: Vault + ?Sized>(
    vault: &V,
    folder: &str,
) -> Result<(), FolderCreationError> {
    // The vault root always exists
    if folder.is_empty() {
        return Ok(());
    }
    let path = normalize_path(folder);
    let wrap = |source| FolderCreationError {
        path: path.clone(),
        source,
    };
    if !vault.exists(&path).await.map_err(wrap)? {
        warn!("creating missing folder {path}");
        vault.create_folder(&path).await.map_err(wrap)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingKey;
    use crate::host::testing::{MemoryVault, RecordingNotifier};
    use chrono::NaiveDate;

    fn tuesday() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 6)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn with_folders() -> Settings {
        Settings::default()
            .with_value(SettingKey::DailyNotesFolder, "Daily".into())
            .with_value(SettingKey::WeeklyNotesFolder, "Weekly".into())
    }

    #[tokio::test]
    async fn test_daily_command_creates_note_and_folder() {
        let vault = MemoryVault::default();
        let notifier = RecordingNotifier::default();

        let ok =
            run_note_command(NoteKind::Daily, &vault, &notifier, &with_folders(), tuesday()).await;
        assert!(ok);
        assert!(vault.folders.lock().unwrap().contains("Daily"));
        let body = vault.read("Daily/2026-01-06.md").unwrap();
        assert!(body.starts_with("*Tuesday January 6th, 2026*\n"));
        assert_eq!(notifier.messages(), vec!["Daily note created"]);
    }

    #[tokio::test]
    async fn test_weekly_command_prepends() {
        let vault = MemoryVault::with_file("2026 - Week 2.md", "OLD");
        let notifier = RecordingNotifier::default();

        let ok =
            run_note_command(NoteKind::Weekly, &vault, &notifier, &Settings::default(), tuesday()).await;
        assert!(ok);
        let text = vault.read("2026 - Week 2.md").unwrap();
        assert!(text.starts_with("*January 5th - 11th*\n"));
        assert!(text.ends_with("---\n\n\nOLD"));
        assert_eq!(
            notifier.messages(),
            vec!["Weekly note template added to existing file"]
        );
        // Root folder is never created
        assert!(vault.folders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_format_reports_failure() {
        let vault = MemoryVault::default();
        let notifier = RecordingNotifier::default();
        let settings =
            Settings::default().with_value(SettingKey::WeeklyNoteFormat, "[GGGG".into());

        let ok = run_note_command(NoteKind::Weekly, &vault, &notifier, &settings, tuesday()).await;
        assert!(!ok);
        assert!(vault.files.lock().unwrap().is_empty());
        assert_eq!(
            notifier.messages(),
            vec![format!("Failed to create weekly note. {FAILURE_HINT}")]
        );
    }

    #[tokio::test]
    async fn test_folder_failure_is_typed() {
        let vault = MemoryVault {
            fail_folders: true,
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();

        let err = create_note(NoteKind::Daily, &vault, &notifier, &with_folders(), tuesday())
            .await
            .unwrap_err();
        assert!(matches!(err, JournalError::Folder(ref f) if f.path == "Daily"));
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_still_succeeds() {
        let vault = MemoryVault {
            fail_open: true,
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();

        let ok =
            run_note_command(NoteKind::Daily, &vault, &notifier, &Settings::default(), tuesday()).await;
        assert!(ok);
        let messages = notifier.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Daily note created");
        assert!(messages[1].starts_with("Daily note written but could not be opened"));
    }
}
