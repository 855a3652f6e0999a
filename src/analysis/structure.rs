use serde::{Deserialize, Serialize};

use crate::github::TreeEntry;

/// Whether a structure entry is a file or a directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One file or directory of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Last path segment
    pub name: String,
    /// Path from the repository root
    pub path: String,
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl FileEntry {
    /// Builds an entry from a path, deriving the name from its last segment
    pub fn new(path: &str, kind: EntryKind, size: Option<u64>) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Self {
            name,
            path: path.to_string(),
            kind,
            size,
        }
    }
}

/// Keeps blobs and trees (submodule commits are dropped), in tree order, up to `limit` entries
pub fn build_structure(tree: &[TreeEntry], limit: usize) -> Vec<FileEntry> {
    tree.iter()
        .filter_map(|entry| {
            let kind = match entry.kind.as_str() {
                "blob" => EntryKind::File,
                "tree" => EntryKind::Directory,
                _ => return None,
            };
            let path = entry.path.as_deref().unwrap_or_default();
            Some(FileEntry::new(path, kind, entry.size))
        })
        .take(limit)
        .collect()
}
