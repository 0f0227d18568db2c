use crate::core::scanner::{has_extension, normalize_path};
use crate::error::OrganizeError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One text file whose embedded image path was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceUpdate {
    pub file: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Default)]
pub struct RewriteOutcome {
    pub updates: Vec<ReferenceUpdate>,
    pub errors: Vec<OrganizeError>,
}

/// Text files directly inside `root` (no recursion) with an allowed extension,
/// sorted by name.
pub fn list_code_files(root: &Path, extensions: &[String]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        if has_extension(&path, extensions) && entry.file_type()?.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Replace every literal occurrence of `from` in `content`. `None` when absent.
pub fn replace_literal(content: &str, from: &str, to: &str) -> Option<String> {
    if from.is_empty() || !content.contains(from) {
        return None;
    }
    Some(content.replace(from, to))
}

fn rewrite_file(path: &Path, from: &str, to: &str) -> std::io::Result<bool> {
    let content = fs::read_to_string(path)?;
    match replace_literal(&content, from, to) {
        Some(updated) => {
            fs::write(path, updated)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Point every reference to `old_path` in the root's text files at `new_path`.
///
/// Both paths are compared in forward-slash form. One update is recorded per
/// file touched; failures on one file do not stop the others.
pub fn rewrite_references(
    root: &Path,
    extensions: &[String],
    old_path: &Path,
    new_path: &Path,
) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();
    let from = normalize_path(old_path);
    let to = normalize_path(new_path);

    let files = match list_code_files(root, extensions) {
        Ok(files) => files,
        Err(source) => {
            outcome.errors.push(OrganizeError::ScanReferences { source });
            return outcome;
        }
    };

    for path in files {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| normalize_path(&path));
        match rewrite_file(&path, &from, &to) {
            Ok(true) => {
                info!("Updated reference in {}: {} → {}", file, from, to);
                outcome.updates.push(ReferenceUpdate {
                    file,
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            Ok(false) => debug!("no reference to {} in {}", from, file),
            Err(source) => outcome
                .errors
                .push(OrganizeError::UpdateReference { file, source }),
        }
    }

    outcome
}
