// Duplicate detection.
// Files are grouped by exact byte size and each group keeps the member with
// the best filename score. Optionally groups are split further by content hash.

use crate::core::scanner::FileRecord;
use crate::core::scoring::quality_score;
use crate::error::OrganizeError;
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

/// Files that share a grouping key. Members keep scan order.
#[derive(Debug, Clone)]
pub struct DuplicateGroup<'a> {
    pub size: u64,
    pub members: Vec<&'a FileRecord>,
}

impl<'a> DuplicateGroup<'a> {
    /// Members best-first: descending score, ties in scan order.
    pub fn ranked(&self) -> Vec<&'a FileRecord> {
        let mut ranked = self.members.clone();
        // sort_by_key is stable
        ranked.sort_by_key(|f| std::cmp::Reverse(quality_score(&f.name)));
        ranked
    }

    pub fn keeper(&self) -> Option<&'a FileRecord> {
        self.ranked().into_iter().next()
    }

    pub fn duplicates(&self) -> Vec<&'a FileRecord> {
        self.ranked().into_iter().skip(1).collect()
    }
}

/// Group records sharing a byte size, ascending by size. Singletons included.
pub fn group_by_size(files: &[FileRecord]) -> Vec<DuplicateGroup<'_>> {
    let mut map: BTreeMap<u64, Vec<&FileRecord>> = BTreeMap::new();
    for file in files {
        map.entry(file.size).or_default().push(file);
    }
    map.into_iter()
        .map(|(size, members)| DuplicateGroup { size, members })
        .collect()
}

fn collect_duplicates(groups: &[DuplicateGroup<'_>]) -> Vec<FileRecord> {
    groups
        .iter()
        .filter(|g| g.members.len() > 1)
        .flat_map(|g| g.duplicates())
        .cloned()
        .collect()
}

/// Every file that loses its size group. Equal size counts as equal content.
pub fn find_duplicates(files: &[FileRecord]) -> Vec<FileRecord> {
    collect_duplicates(&group_by_size(files))
}

pub fn content_hash(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Like [`find_duplicates`], but only files with identical bytes are grouped.
///
/// Paths are resolved against `root`. A file that cannot be hashed is kept
/// out of every group and the failure is returned alongside.
pub fn find_duplicates_verified(
    root: &Path,
    files: &[FileRecord],
) -> (Vec<FileRecord>, Vec<OrganizeError>) {
    let mut errors = Vec::new();
    let mut groups = Vec::new();

    for group in group_by_size(files) {
        if group.members.len() < 2 {
            continue;
        }
        let mut by_hash: BTreeMap<String, Vec<&FileRecord>> = BTreeMap::new();
        for &file in &group.members {
            match content_hash(&root.join(&file.path)) {
                Ok(hash) => by_hash.entry(hash).or_default().push(file),
                Err(source) => errors.push(OrganizeError::Hash {
                    path: file.display_path(),
                    source,
                }),
            }
        }
        groups.extend(by_hash.into_values().map(|members| DuplicateGroup {
            size: group.size,
            members,
        }));
    }

    (collect_duplicates(&groups), errors)
}
