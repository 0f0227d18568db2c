use crate::error::OrganizeError;
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::{DirEntry, WalkDir};

/// One discovered image. `path` and `directory` are relative to the scan root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub directory: PathBuf,
}

impl FileRecord {
    /// Path with forward slashes, the form used in reports and text references.
    pub fn display_path(&self) -> String {
        normalize_path(&self.path)
    }
}

/// Result of a scan: whatever could be read, plus the failures met on the way.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<FileRecord>,
    pub errors: Vec<OrganizeError>,
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub extensions: Vec<String>,
    pub skip_dirs: Vec<String>,
}

pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True when `path` has one of `extensions` (compared case-insensitively, no dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

fn is_skipped(entry: &DirEntry, options: &ScanOptions) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.file_type().is_dir() && options.skip_dirs.iter().any(|d| *d == name)
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Recursively walk `root`, returning every image file it holds.
///
/// Symlinks are followed. Hidden entries and the configured skip directories
/// are pruned. Unreadable directories, broken links and link loops are
/// reported in the outcome and the walk continues.
pub fn scan_directory(root: &Path, options: &ScanOptions) -> ScanOutcome {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Scanning for images…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut outcome = ScanOutcome::default();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e, options));

    for entry in walker {
        spinner.tick();
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let dir = err
                    .path()
                    .map(|p| relative_to(root, p))
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| root.to_path_buf());
                let message = err
                    .io_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| err.to_string());
                outcome.errors.push(OrganizeError::ReadDir {
                    dir: normalize_path(&dir),
                    message,
                });
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), &options.extensions) {
            continue;
        }

        let path = relative_to(root, entry.path());
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        match entry.metadata() {
            Ok(meta) => {
                debug!("found {} ({} bytes)", path.display(), meta.len());
                outcome.files.push(FileRecord {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    size: meta.len(),
                    path,
                    directory,
                });
            }
            Err(err) => outcome.errors.push(OrganizeError::ReadDir {
                dir: normalize_path(&directory),
                message: err.to_string(),
            }),
        }
    }

    spinner.finish_and_clear();
    outcome
}
