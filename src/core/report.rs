use crate::core::references::ReferenceUpdate;
use crate::error::OrganizeError;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePlan {
    pub from: String,
    pub to: String,
}

/// Everything one organizer run did, in the order it happened.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Report {
    pub original_files: Vec<String>,
    pub renamed_files: Vec<RenamePlan>,
    pub duplicates_removed: Vec<String>,
    pub code_updates: Vec<ReferenceUpdate>,
    pub errors: Vec<String>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, err: OrganizeError) {
        warn!("{}", err);
        self.errors.push(err.to_string());
    }

    pub fn record_errors(&mut self, errors: impl IntoIterator<Item = OrganizeError>) {
        for err in errors {
            self.record_error(err);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.original_files.is_empty()
            && self.renamed_files.is_empty()
            && self.duplicates_removed.is_empty()
            && self.code_updates.is_empty()
            && self.errors.is_empty()
    }

    pub fn to_markdown(&self, generated: DateTime<Utc>) -> String {
        let mut lines = vec![
            "# Image Organization Report".to_string(),
            String::new(),
            format!("Generated: {}", generated.to_rfc3339()),
            String::new(),
            "## Summary".to_string(),
            format!("- Original files found: {}", self.original_files.len()),
            format!("- Files renamed: {}", self.renamed_files.len()),
            format!("- Duplicates removed: {}", self.duplicates_removed.len()),
            format!("- Code files updated: {}", self.code_updates.len()),
            format!("- Errors encountered: {}", self.errors.len()),
            String::new(),
            "## Renamed Files".to_string(),
        ];
        lines.extend(
            self.renamed_files
                .iter()
                .map(|r| format!("- {} → {}", r.from, r.to)),
        );
        lines.push(String::new());
        lines.push("## Duplicates Removed".to_string());
        lines.extend(self.duplicates_removed.iter().map(|p| format!("- {}", p)));
        lines.push(String::new());
        lines.push("## Code Updates".to_string());
        lines.extend(
            self.code_updates
                .iter()
                .map(|u| format!("- {}: {} → {}", u.file, u.from, u.to)),
        );
        lines.push(String::new());

        if !self.errors.is_empty() {
            lines.push("## Errors".to_string());
            lines.extend(self.errors.iter().map(|e| format!("- {}", e)));
        }

        lines.join("\n")
    }

    pub fn write_markdown(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_markdown(Utc::now()))
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
