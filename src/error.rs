use std::io;
use thiserror::Error;

/// Non-fatal failures collected while organizing.
///
/// Each variant renders to the line that ends up under `## Errors` in the
/// report, so the messages are part of the output format.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Error creating directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("Error reading directory {dir}: {message}")]
    ReadDir { dir: String, message: String },

    #[error("Error backing up {path}: {source}")]
    Backup { path: String, source: io::Error },

    #[error("Error removing duplicate {path}: {source}")]
    RemoveDuplicate { path: String, source: io::Error },

    #[error("Error hashing {path}: {source}")]
    Hash { path: String, source: io::Error },

    #[error("Error renaming {path}: {source}")]
    Rename { path: String, source: io::Error },

    #[error("Error updating {file}: {source}")]
    UpdateReference { file: String, source: io::Error },

    #[error("Error scanning for code updates: {source}")]
    ScanReferences { source: io::Error },
}
