use std::path::{Component, Path, PathBuf};

pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "svg"];
pub const CODE_EXTENSIONS: [&str; 7] = ["html", "css", "js", "php", "jsx", "tsx", "vue"];
pub const DEPENDENCY_CACHE_DIR: &str = "node_modules";

/// Settings for one organizer run. `Default` gives the bare-invocation behavior.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    /// Directory that is scanned and that holds the text files to rewrite.
    pub root: PathBuf,
    /// Folder (relative to `root`) that receives renamed images.
    pub target_dir: PathBuf,
    /// Folder (relative to `root`) that receives a copy of every scanned image.
    pub backup_dir: PathBuf,
    pub image_extensions: Vec<String>,
    pub code_extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Split equal-size groups by content hash before ranking.
    pub verify_content: bool,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            target_dir: PathBuf::from("images"),
            backup_dir: PathBuf::from("images_backup"),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            code_extensions: CODE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: vec![DEPENDENCY_CACHE_DIR.to_string()],
            verify_content: false,
        }
    }
}

impl OrganizerConfig {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Drop `.` components from the folder settings so that `./images` and
    /// `images` name the same place when compared against scanned paths.
    pub fn normalized(mut self) -> Self {
        self.target_dir = strip_cur_dir(&self.target_dir);
        self.backup_dir = strip_cur_dir(&self.backup_dir);
        self
    }

    /// Skip list used by the scanner: the configured names plus the backup folder.
    pub fn scan_skip_dirs(&self) -> Vec<String> {
        let mut dirs = self.skip_dirs.clone();
        if let Some(name) = self.backup_dir.file_name() {
            let name = name.to_string_lossy().into_owned();
            if !dirs.contains(&name) {
                dirs.push(name);
            }
        }
        dirs
    }
}

pub fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
