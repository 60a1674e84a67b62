use std::io;

use tracing::{debug, info, warn};

use crate::error::WriteError;
use crate::generator::GeneratedNote;
use crate::host::Vault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    Created,
    Prepended,
}

#[derive(Debug)]
pub struct WriteOutcome {
    pub action: WriteAction,
    /// Opening the note afterwards failed. The write itself succeeded.
    pub open_error: Option<WriteError>,
}

/// Create `note.file_path` with the note body, or prepend the body to the
/// existing content (`body + "\n" + old`).
pub async fn write_note<V: Vault + ?Sized>(
    vault: &V,
    note: &GeneratedNote,
) -> Result<WriteOutcome, WriteError> {
    let path = note.file_path.as_str();
    let exists = vault.exists(path).await.map_err(|source| WriteError::Lookup {
        path: path.to_string(),
        source,
    })?;

    let action = if exists {
        prepend(vault, note).await?
    } else {
        match vault.create(path, &note.body).await {
            Ok(()) => WriteAction::Created,
            // Someone created it after the exists check
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{path} appeared before create, prepending instead");
                prepend(vault, note).await?
            }
            Err(source) => {
                return Err(WriteError::Create {
                    path: path.to_string(),
                    source,
                })
            }
        }
    };
    info!("{} note {path}: {action:?}", note.kind);

    let open_error = match vault.open(path).await {
        Ok(()) => None,
        Err(source) => {
            warn!("could not open {path}: {source}");
            Some(WriteError::Open {
                path: path.to_string(),
                source,
            })
        }
    };

    Ok(WriteOutcome { action, open_error })
}

async fn prepend<V: Vault + ?Sized>(
    vault: &V,
    note: &GeneratedNote,
) -> Result<WriteAction, WriteError> {
    let body = note.body.as_str();
    vault
        .process(&note.file_path, &|old: &str| format!("{body}\n{old}"))
        .await
        .map_err(|source| WriteError::Update {
            path: note.file_path.clone(),
            source,
        })?;
    Ok(WriteAction::Prepended)
}
