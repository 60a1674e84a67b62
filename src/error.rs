use std::io;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::generator::NoteKind;

/// A format pattern could not be rendered for a date.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unterminated `[` literal in format `{pattern}` at byte {position}")]
    UnterminatedLiteral { pattern: String, position: usize },

    #[error("date out of range: {base} offset by {days} days")]
    OutOfRange { base: NaiveDateTime, days: i64 },
}

/// Rendering the filename or body of a note failed.
#[derive(Debug, Error)]
#[error("failed to generate {kind} note content")]
pub struct ContentGenerationError {
    pub kind: NoteKind,
    #[source]
    pub source: FormatError,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to check whether `{path}` exists")]
    Lookup {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to create `{path}`")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to prepend to `{path}`")]
    Update {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open `{path}`")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
#[error("failed to create folder `{path}`")]
pub struct FolderCreationError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Everything a note command can fail with.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Content(#[from] ContentGenerationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Folder(#[from] FolderCreationError),
}
