/*!
 * Core types and data structures for mdexport
 */

use std::path::{Path, PathBuf};

/// A text file collected during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Path relative to the scan root
    pub relative_path: PathBuf,
    /// Decoded file content
    pub content: String,
    /// Size in bytes as reported by the filesystem
    pub size_bytes: u64,
    /// Lowercased extension including the leading dot, empty if none
    pub extension: String,
}

impl FileRecord {
    /// Relative path rendered with `/` separators regardless of platform
    pub fn display_path(&self) -> String {
        display_relative(&self.relative_path)
    }
}

/// Render a relative path with `/` separators
pub fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercased extension of a path with its leading dot, or an empty string.
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Per-extension aggregate used by the statistics section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionStat {
    /// Extension with leading dot, empty for files without one
    pub extension: String,
    /// Number of files with this extension
    pub file_count: usize,
    /// Sum of their sizes in bytes
    pub total_bytes: u64,
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory; `followed_link` marks one reached through a symlink
    Directory { followed_link: bool },
    /// Regular file, or a symlink resolving to one
    File,
    /// Sockets, fifos, dangling links and the like
    Other,
}

/// A single entry of a filtered directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    /// Entry name
    pub name: String,
    /// Absolute path
    pub path: PathBuf,
    /// Entry kind
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    /// Directories reached through symlinks are listed but never entered
    pub fn can_descend(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::Directory {
                followed_link: false
            }
        )
    }
}
