use crate::config::OrganizerConfig;
use crate::core::duplicate::{find_duplicates, find_duplicates_verified};
use crate::core::naming::{NameRegistry, canonical_name};
use crate::core::references::rewrite_references;
use crate::core::report::{RenamePlan, Report};
use crate::core::scanner::{FileRecord, ScanOptions, normalize_path, scan_directory};
use crate::error::OrganizeError;
use log::{info, warn};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a run would do, computed without modifying anything.
#[derive(Debug, Default)]
pub struct OrganizePlan {
    pub files: Vec<FileRecord>,
    pub duplicates: Vec<FileRecord>,
    /// Survivors in scan order with their destination (relative to the root).
    pub renames: Vec<(FileRecord, PathBuf)>,
    pub errors: Vec<OrganizeError>,
}

impl OrganizePlan {
    /// Renames whose destination differs from the current location.
    pub fn moves(&self) -> impl Iterator<Item = &(FileRecord, PathBuf)> {
        self.renames.iter().filter(|(file, to)| file.path != *to)
    }
}

pub struct Organizer {
    config: OrganizerConfig,
}

impl Organizer {
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    fn root(&self) -> &Path {
        &self.config.root
    }

    fn in_target_dir(&self, file: &FileRecord) -> bool {
        file.directory == self.config.target_dir
    }

    /// Scan, detect duplicates and name the survivors.
    pub fn plan(&self) -> OrganizePlan {
        let options = ScanOptions {
            extensions: self.config.image_extensions.clone(),
            skip_dirs: self.config.scan_skip_dirs(),
        };
        let scan = scan_directory(self.root(), &options);
        let mut plan = OrganizePlan {
            files: scan.files,
            errors: scan.errors,
            ..OrganizePlan::default()
        };
        info!("Found {} image files", plan.files.len());
        if plan.files.is_empty() {
            return plan;
        }

        plan.duplicates = if self.config.verify_content {
            let (duplicates, errors) = find_duplicates_verified(self.root(), &plan.files);
            plan.errors.extend(errors);
            duplicates
        } else {
            find_duplicates(&plan.files)
        };

        let removed: HashSet<&Path> = plan.duplicates.iter().map(|d| d.path.as_path()).collect();
        let survivors: Vec<&FileRecord> = plan
            .files
            .iter()
            .filter(|f| !removed.contains(f.path.as_path()))
            .collect();

        // Survivors already in the target folder are never deleted, so their
        // names stay taken for the whole run.
        let mut registry = NameRegistry::new();
        for file in survivors.iter().filter(|f| self.in_target_dir(f)) {
            registry.claim(&file.name);
        }

        plan.renames = survivors
            .into_iter()
            .enumerate()
            .map(|(index, file)| {
                let candidate = canonical_name(&file.name, index);
                let name = if self.in_target_dir(file) && candidate == file.name {
                    candidate
                } else {
                    registry.claim(&candidate)
                };
                (file.clone(), self.config.target_dir.join(name))
            })
            .collect();

        plan
    }

    fn ensure_dir(&self, dir: &Path, report: &mut Report) {
        let path = self.root().join(dir);
        if let Err(source) = fs::create_dir_all(&path) {
            report.record_error(OrganizeError::CreateDir {
                path: normalize_path(dir),
                source,
            });
        }
    }

    fn backup(&self, files: &[FileRecord], report: &mut Report) {
        let backup_dir = self.root().join(&self.config.backup_dir);
        for file in files {
            // basename collisions overwrite, last file wins
            if let Err(source) = fs::copy(self.root().join(&file.path), backup_dir.join(&file.name)) {
                report.record_error(OrganizeError::Backup {
                    path: file.display_path(),
                    source,
                });
            }
        }
    }

    fn remove_duplicates(&self, duplicates: &[FileRecord], report: &mut Report) {
        for dup in duplicates {
            match fs::remove_file(self.root().join(&dup.path)) {
                Ok(()) => {
                    info!("Removed duplicate: {}", dup.display_path());
                    report.duplicates_removed.push(dup.display_path());
                }
                Err(source) => report.record_error(OrganizeError::RemoveDuplicate {
                    path: dup.display_path(),
                    source,
                }),
            }
        }
    }

    fn rename(&self, file: &FileRecord, to: &Path, report: &mut Report) -> Result<(), OrganizeError> {
        let rename_error = |source: io::Error| OrganizeError::Rename {
            path: file.display_path(),
            source,
        };
        let src = self.root().join(&file.path);
        let dst = self.root().join(to);
        if dst.exists() {
            return Err(rename_error(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} already exists", normalize_path(to)),
            )));
        }
        fs::copy(&src, &dst).map_err(rename_error)?;

        let rewrite = rewrite_references(
            self.root(),
            &self.config.code_extensions,
            &file.path,
            to,
        );
        report.code_updates.extend(rewrite.updates);
        report.record_errors(rewrite.errors);

        if !file.path.starts_with(&self.config.target_dir) {
            fs::remove_file(&src).map_err(rename_error)?;
        }
        Ok(())
    }

    /// Run the whole pipeline. Every failure is recorded in the report and the
    /// run carries on with the next item.
    pub fn organize(&self) -> Report {
        let mut report = Report::new();
        info!("Starting image organization in {}", self.root().display());

        self.ensure_dir(&self.config.target_dir, &mut report);
        self.ensure_dir(&self.config.backup_dir, &mut report);

        let mut plan = self.plan();
        report.record_errors(std::mem::take(&mut plan.errors));
        if plan.files.is_empty() {
            warn!("No image files found to organize");
            return report;
        }
        report.original_files = plan.files.iter().map(FileRecord::display_path).collect();

        self.backup(&plan.files, &mut report);
        self.remove_duplicates(&plan.duplicates, &mut report);

        for (file, to) in plan.moves() {
            match self.rename(file, to, &mut report) {
                Ok(()) => {
                    let to = normalize_path(to);
                    info!("Renamed: {} -> {}", file.display_path(), to);
                    report.renamed_files.push(RenamePlan {
                        from: file.display_path(),
                        to,
                    });
                }
                Err(err) => report.record_error(err),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn organizer(root: &Path) -> Organizer {
        Organizer::new(OrganizerConfig::with_root(root))
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let report = organizer(root).organize();
        assert!(report.is_empty());
        assert!(root.join("images").is_dir());
        assert!(root.join("images_backup").is_dir());
        assert_eq!(fs::read_dir(root.join("images")).unwrap().count(), 0);
        assert_eq!(fs::read_dir(root.join("images_backup")).unwrap().count(), 0);
    }

    #[test]
    fn test_plan_does_not_touch_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("img.png"), vec![0u8; 1000]).unwrap();
        fs::write(root.join("whatsapp_img.png"), vec![1u8; 1000]).unwrap();
        fs::write(root.join("random_photo.gif"), b"gif").unwrap();

        let plan = organizer(root).plan();
        assert_eq!(plan.files.len(), 3);
        assert_eq!(plan.duplicates.len(), 1);
        assert_eq!(plan.duplicates[0].name, "whatsapp_img.png");

        let targets: Vec<String> = plan.renames.iter().map(|(_, to)| normalize_path(to)).collect();
        assert_eq!(targets, vec!["images/image_01.png", "images/image_02.gif"]);
        assert_eq!(plan.moves().count(), 2);

        assert!(!root.join("images").exists());
        assert!(root.join("whatsapp_img.png").exists());
    }

    #[test]
    fn test_colliding_names_are_suffixed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("hero.jpg"), b"1").unwrap();
        fs::write(root.join("banner.jpg"), b"22").unwrap();

        let report = organizer(root).organize();
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        let targets: Vec<&str> = report.renamed_files.iter().map(|r| r.to.as_str()).collect();
        assert_eq!(targets, vec!["images/hero_main.jpg", "images/hero_main_2.jpg"]);
        assert_eq!(fs::read(root.join("images/hero_main.jpg")).unwrap(), b"22");
        assert_eq!(fs::read(root.join("images/hero_main_2.jpg")).unwrap(), b"1");
    }

    #[test]
    fn test_file_already_in_target_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("images")).unwrap();
        fs::write(root.join("images/old_name.png"), b"abc").unwrap();

        let report = organizer(root).organize();
        assert_eq!(
            report.renamed_files,
            vec![RenamePlan {
                from: "images/old_name.png".into(),
                to: "images/image_01.png".into(),
            }]
        );
        assert!(root.join("images/old_name.png").exists());
        assert!(root.join("images/image_01.png").exists());
    }

    #[test]
    fn test_already_canonical_file_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("images")).unwrap();
        fs::write(root.join("images/hero_main.jpg"), b"abc").unwrap();

        let report = organizer(root).organize();
        assert_eq!(report.original_files, vec!["images/hero_main.jpg"]);
        assert!(report.renamed_files.is_empty());
        assert!(root.join("images/hero_main.jpg").exists());
        assert!(root.join("images_backup/hero_main.jpg").exists());
    }

    #[test]
    fn test_verify_content_keeps_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.png"), b"aaaa").unwrap();
        fs::write(root.join("b copy.png"), b"bbbb").unwrap();

        let mut config = OrganizerConfig::with_root(root);
        config.verify_content = true;
        let report = Organizer::new(config).organize();
        assert!(report.duplicates_removed.is_empty());
        assert_eq!(report.renamed_files.len(), 2);
    }

    fn record(root: &Path, rel: &str) -> FileRecord {
        let path = PathBuf::from(rel);
        FileRecord {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            directory: match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
                _ => PathBuf::from("."),
            },
            size: fs::metadata(root.join(rel)).map(|m| m.len()).unwrap_or(0),
            path,
        }
    }

    #[test]
    fn test_rerun_keeps_images_already_in_target() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("images")).unwrap();
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("images/image_01.png"), b"ORIGINAL-FIRST-RUN").unwrap();
        fs::write(root.join("assets/new.png"), b"new").unwrap();
        fs::write(
            root.join("index.html"),
            r#"<img src="assets/new.png"><img src="images/image_01.png">"#,
        )
        .unwrap();

        let report = organizer(root).organize();
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(
            report.renamed_files,
            vec![
                RenamePlan {
                    from: "assets/new.png".into(),
                    to: "images/image_01_2.png".into(),
                },
                RenamePlan {
                    from: "images/image_01.png".into(),
                    to: "images/image_02.png".into(),
                },
            ]
        );
        assert_eq!(
            fs::read(root.join("images/image_01.png")).unwrap(),
            b"ORIGINAL-FIRST-RUN"
        );
        assert_eq!(
            fs::read(root.join("images/image_02.png")).unwrap(),
            b"ORIGINAL-FIRST-RUN"
        );
        assert_eq!(fs::read(root.join("images/image_01_2.png")).unwrap(), b"new");
        assert_eq!(
            fs::read_to_string(root.join("index.html")).unwrap(),
            r#"<img src="images/image_01_2.png"><img src="images/image_02.png">"#
        );
    }

    #[test]
    fn test_rename_refuses_existing_destination() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("images")).unwrap();
        fs::write(root.join("images/taken.png"), b"keep").unwrap();
        fs::write(root.join("a.png"), b"incoming").unwrap();

        let mut report = Report::new();
        let err = organizer(root)
            .rename(&record(root, "a.png"), Path::new("images/taken.png"), &mut report)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error renaming a.png: images/taken.png already exists"
        );
        assert_eq!(fs::read(root.join("images/taken.png")).unwrap(), b"keep");
        assert!(root.join("a.png").exists());
        assert!(report.code_updates.is_empty());
    }

    #[test]
    fn test_dot_prefixed_target_dir_keeps_originals() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join("images")).unwrap();
        fs::write(root.join("images/old_name.png"), b"abc").unwrap();

        let config = OrganizerConfig {
            target_dir: PathBuf::from("./images"),
            ..OrganizerConfig::with_root(root)
        };
        let report = Organizer::new(config).organize();
        assert!(report.errors.is_empty(), "{:?}", report.errors);
        assert_eq!(
            report.renamed_files,
            vec![RenamePlan {
                from: "images/old_name.png".into(),
                to: "images/image_01.png".into(),
            }]
        );
        assert!(root.join("images/old_name.png").exists());
        assert!(root.join("images/image_01.png").exists());
    }

    #[test]
    fn test_backup_failure_is_recorded_and_run_continues() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // a plain file where the backup folder should go
        fs::write(root.join("images_backup"), b"").unwrap();
        fs::write(root.join("a.png"), b"x").unwrap();

        let report = organizer(root).organize();
        assert_eq!(report.errors.len(), 2, "{:?}", report.errors);
        assert!(report.errors[0].starts_with("Error creating directory images_backup: "));
        assert!(report.errors[1].starts_with("Error backing up a.png: "));
        assert_eq!(
            report.renamed_files,
            vec![RenamePlan {
                from: "a.png".into(),
                to: "images/image_01.png".into(),
            }]
        );
        assert!(root.join("images/image_01.png").exists());
    }

    #[test]
    fn test_duplicate_removal_failure_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("dup.png"), b"x").unwrap();
        let missing = record(root, "gone.png");
        let present = record(root, "dup.png");
        let not_found = fs::remove_file(root.join("gone.png")).unwrap_err();

        let mut report = Report::new();
        organizer(root).remove_duplicates(&[missing, present], &mut report);

        assert_eq!(
            report.errors,
            vec![format!("Error removing duplicate gone.png: {}", not_found)]
        );
        assert_eq!(report.duplicates_removed, vec!["dup.png"]);
        assert!(!root.join("dup.png").exists());
    }

    #[test]
    fn test_rename_failure_is_not_recorded_as_rename() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        // a plain file where the target folder should go
        fs::write(root.join("images"), b"").unwrap();
        fs::write(root.join("a.png"), b"x").unwrap();
        fs::write(root.join("b.gif"), b"yy").unwrap();
        fs::write(root.join("index.html"), r#"<img src="a.png">"#).unwrap();
        let not_a_dir = fs::write(root.join("images/image_01.png"), b"").unwrap_err();

        let report = organizer(root).organize();
        assert!(report.renamed_files.is_empty());
        assert_eq!(report.errors.len(), 3, "{:?}", report.errors);
        assert!(report.errors[0].starts_with("Error creating directory images: "));
        assert_eq!(
            report.errors[1],
            format!("Error renaming a.png: {}", not_a_dir)
        );
        assert_eq!(
            report.errors[2],
            format!("Error renaming b.gif: {}", not_a_dir)
        );
        // nothing moved, nothing rewritten, both files still backed up
        assert!(root.join("a.png").exists());
        assert!(root.join("b.gif").exists());
        assert!(root.join("images_backup/a.png").exists());
        assert_eq!(
            fs::read_to_string(root.join("index.html")).unwrap(),
            r#"<img src="a.png">"#
        );
    }
}
