/*!
 * Directory and file scanning functionality
 *
 * The scanner owns the ignore predicate. Both the flat file collection and
 * the filtered listings handed to the tree renderer share one listing
 * routine, so content and structure never disagree about what is excluded.
 * Only the collection pass feeds the statistics.
 */

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::ProgressBar;
use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::ExportConfig;
use crate::pattern::matches_any;
use crate::types::{extension_of, DirEntryInfo, EntryKind, FileRecord};
use crate::utils::{compare_names, format_file_size};

/// Scanner statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Files turned into records
    pub files_collected: usize,
    /// Files skipped for exceeding the size limit
    pub skipped_too_large: usize,
    /// Files that could not be read or decoded as text
    pub skipped_unreadable: usize,
    /// Entries removed by ignore rules
    pub entries_ignored: usize,
    /// Directories that could not be listed
    pub unreadable_directories: usize,
}

#[derive(Debug, Default)]
struct Counters {
    files_collected: AtomicUsize,
    skipped_too_large: AtomicUsize,
    skipped_unreadable: AtomicUsize,
    entries_ignored: AtomicUsize,
    unreadable_directories: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// Scanner for directory contents
pub struct Scanner<'a> {
    /// Scan root
    root: PathBuf,
    /// Inclusion rules
    config: &'a ExportConfig,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Scanner statistics
    counters: Counters,
    /// Canonical path of a file that is never listed, such as the export's own output
    excluded_file: Option<PathBuf>,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner
    pub fn new(root: impl Into<PathBuf>, config: &'a ExportConfig, progress: Arc<ProgressBar>) -> Self {
        Self {
            root: root.into(),
            config,
            progress,
            counters: Counters::default(),
            excluded_file: None,
        }
    }

    /// Leave out the file at `path` wherever it shows up below the root.
    ///
    /// Only that exact file is affected; other files with the same name are
    /// still listed. A path that does not exist yet excludes nothing.
    pub fn with_excluded_file(mut self, path: &Path) -> Self {
        self.excluded_file = fs::canonicalize(path).ok();
        self
    }

    /// Scan root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Inclusion rules this scanner applies
    pub fn config(&self) -> &ExportConfig {
        self.config
    }

    /// Get scanner statistics
    pub fn statistics(&self) -> ScanStatistics {
        let c = &self.counters;
        ScanStatistics {
            files_collected: c.files_collected.load(Ordering::Relaxed),
            skipped_too_large: c.skipped_too_large.load(Ordering::Relaxed),
            skipped_unreadable: c.skipped_unreadable.load(Ordering::Relaxed),
            entries_ignored: c.entries_ignored.load(Ordering::Relaxed),
            unreadable_directories: c.unreadable_directories.load(Ordering::Relaxed),
        }
    }

    /// Collect every qualifying text file under the root, sorted by relative path.
    ///
    /// A root that does not exist or is not a directory yields no files.
    pub fn collect_files(&self) -> Vec<FileRecord> {
        let mut files = Vec::new();

        if !self.root.is_dir() {
            warn!("Scan root {} is not a readable directory", self.root.display());
            return files;
        }

        self.collect_directory(&self.root, &mut files);

        files.sort_by(|a, b| compare_names(&a.display_path(), &b.display_path()));
        files
    }

    /// Collect the files of one directory, then descend into its subdirectories
    fn collect_directory(&self, dir: &Path, files: &mut Vec<FileRecord>) {
        let (dirs, regular): (Vec<_>, Vec<_>) = self
            .read_listing(dir, true)
            .into_iter()
            .filter(|entry| entry.kind != EntryKind::Other)
            .partition(DirEntryInfo::is_dir);

        // Process directories first (sequential)
        if self.config.recursive {
            for entry in &dirs {
                if entry.can_descend() {
                    self.collect_directory(&entry.path, files);
                } else {
                    debug!("Not following directory link {}", entry.path.display());
                }
            }
        }

        // Process files in parallel
        let records: Vec<FileRecord> = regular
            .par_iter()
            .filter_map(|entry| self.read_file(entry))
            .collect();

        files.extend(records);
    }

    /// Turn a file entry into a record, or skip it with a diagnostic
    fn read_file(&self, entry: &DirEntryInfo) -> Option<FileRecord> {
        let path = &entry.path;

        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                warn!("Skipping file {}: {}", path.display(), e);
                bump(&self.counters.skipped_unreadable);
                return None;
            }
        };

        let limit = self.config.max_file_size_bytes;
        if limit > 0 && size > limit {
            debug!(
                "Skipping large file {} ({} > {})",
                path.display(),
                format_file_size(size),
                format_file_size(limit)
            );
            bump(&self.counters.skipped_too_large);
            return None;
        }

        let content = match fs::read(path).map(String::from_utf8) {
            Ok(Ok(content)) => content,
            Ok(Err(_)) => {
                warn!("Skipping file {}: not valid UTF-8 text", path.display());
                bump(&self.counters.skipped_unreadable);
                return None;
            }
            Err(e) => {
                warn!("Skipping file {}: {}", path.display(), e);
                bump(&self.counters.skipped_unreadable);
                return None;
            }
        };

        self.progress.inc(1);
        // Truncate if too long to avoid display issues
        let display_name = if entry.name.chars().count() > 40 {
            let tail: String = entry.name.chars().rev().take(37).collect();
            format!("...{}", tail.chars().rev().collect::<String>())
        } else {
            entry.name.clone()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        bump(&self.counters.files_collected);

        Some(FileRecord {
            absolute_path: path.clone(),
            relative_path: path.strip_prefix(&self.root).unwrap_or(path).to_path_buf(),
            content,
            size_bytes: size,
            extension: extension_of(path),
        })
    }

    /// List a directory with ignored entries removed.
    ///
    /// Directories come first, then files; each group is ordered by name.
    /// A directory that cannot be listed is treated as empty. Statistics are
    /// only counted while collecting files, so listing a directory again for
    /// the tree leaves them untouched.
    pub fn list_entries(&self, dir: &Path) -> Vec<DirEntryInfo> {
        self.read_listing(dir, false)
    }

    fn read_listing(&self, dir: &Path, counting: bool) -> Vec<DirEntryInfo> {
        let mut entries = Vec::new();

        for item in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    if !counting {
                        debug!("Cannot list {}: {}", dir.display(), e);
                    } else if e.depth() == 0 {
                        warn!("Cannot read directory {}: {}", dir.display(), e);
                        bump(&self.counters.unreadable_directories);
                    } else {
                        warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    }
                    continue;
                }
            };

            if self.is_ignored(entry.path()) {
                if counting {
                    bump(&self.counters.entries_ignored);
                }
                continue;
            }

            if self.is_excluded_file(entry.path()) {
                debug!("Leaving out {}", entry.path().display());
                continue;
            }

            let file_type = entry.file_type();
            let kind = if file_type.is_dir() {
                EntryKind::Directory {
                    followed_link: false,
                }
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => EntryKind::Directory {
                        followed_link: true,
                    },
                    Ok(target) if target.is_file() => EntryKind::File,
                    _ => EntryKind::Other,
                }
            } else {
                EntryKind::Other
            };

            entries.push(DirEntryInfo {
                name: entry.file_name().to_string_lossy().to_string(),
                path: entry.into_path(),
                kind,
            });
        }

        entries.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| compare_names(&a.name, &b.name))
        });
        entries
    }

    fn is_excluded_file(&self, path: &Path) -> bool {
        match &self.excluded_file {
            Some(excluded) => {
                path.file_name() == excluded.file_name()
                    && fs::canonicalize(path).is_ok_and(|resolved| &resolved == excluded)
            }
            None => false,
        }
    }

    /// Check if a path should be ignored based on extension and name patterns.
    ///
    /// Patterns are tested against the basename and against every single
    /// segment of the path relative to the root, never as substrings.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let extension = extension_of(path);
        if !extension.is_empty() && self.config.ignore_extensions.contains(&extension) {
            return true;
        }

        let patterns = &self.config.ignore_names;
        if patterns.is_empty() {
            return false;
        }

        if let Some(name) = path.file_name() {
            if matches_any(&name.to_string_lossy(), patterns) {
                return true;
            }
        }

        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .any(|component| match component {
                Component::Normal(segment) => matches_any(&segment.to_string_lossy(), patterns),
                _ => false,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn config_with(names: &[&str], exts: &[&str]) -> ExportConfig {
        ExportConfig {
            ignore_names: names.iter().map(|s| s.to_string()).collect(),
            ignore_extensions: exts.iter().map(|s| s.to_string()).collect(),
            ..ExportConfig::default()
        }
    }

    fn hidden() -> Arc<ProgressBar> {
        Arc::new(ProgressBar::hidden())
    }

    #[test]
    fn test_is_ignored_segment_not_substring() {
        let config = config_with(&["out"], &[]);
        let scanner = Scanner::new("/project", &config, hidden());

        assert!(scanner.is_ignored(Path::new("/project/out")));
        assert!(scanner.is_ignored(Path::new("/project/app/out/index.js")));
        assert!(!scanner.is_ignored(Path::new("/project/app/layout.tsx")));
        assert!(!scanner.is_ignored(Path::new("/project/output/main.rs")));
    }

    #[test]
    fn test_is_ignored_root_name_does_not_count() {
        let config = config_with(&["build"], &[]);
        let scanner = Scanner::new("/work/build", &config, hidden());

        assert!(!scanner.is_ignored(Path::new("/work/build/src/main.rs")));
        assert!(scanner.is_ignored(Path::new("/work/build/src/build")));
    }

    #[test]
    fn test_is_ignored_extension() {
        let config = config_with(&[], &[".png"]);
        let scanner = Scanner::new("/p", &config, hidden());

        assert!(scanner.is_ignored(Path::new("/p/img/logo.PNG")));
        assert!(!scanner.is_ignored(Path::new("/p/img/logo.svg")));
        assert!(!scanner.is_ignored(Path::new("/p/png")));
    }

    #[test]
    fn test_is_ignored_wildcard() {
        let config = config_with(&["*.log", "test.*"], &[]);
        let scanner = Scanner::new("/p", &config, hidden());

        assert!(scanner.is_ignored(Path::new("/p/debug.log")));
        assert!(scanner.is_ignored(Path::new("/p/test.ts")));
        assert!(!scanner.is_ignored(Path::new("/p/debug.log.txt")));
        assert!(!scanner.is_ignored(Path::new("/p/latest.ts")));
    }

    #[test]
    fn test_list_entries_dirs_first() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("A.txt")).unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();

        let config = config_with(&["node_modules"], &[]);
        let scanner = Scanner::new(dir.path(), &config, hidden());
        let names: Vec<String> = scanner
            .list_entries(dir.path())
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["alpha", "zeta", "A.txt", "b.txt"]);
        assert_eq!(scanner.statistics().entries_ignored, 0);

        scanner.collect_files();
        scanner.list_entries(dir.path());
        assert_eq!(scanner.statistics().entries_ignored, 1);
    }

    #[test]
    fn test_list_entries_missing_directory() {
        let dir = tempdir().unwrap();
        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden());

        assert!(scanner.list_entries(&dir.path().join("gone")).is_empty());
        assert_eq!(scanner.statistics().unreadable_directories, 0);
    }

    #[test]
    fn test_directory_removed_during_scan() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone");
        fs::create_dir(&gone).unwrap();
        File::create(gone.join("a.txt")).unwrap();
        fs::remove_dir_all(&gone).unwrap();

        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden());
        let mut files = Vec::new();
        scanner.collect_directory(&gone, &mut files);

        assert!(files.is_empty());
        assert_eq!(scanner.statistics().unreadable_directories, 1);

        scanner.list_entries(&gone);
        assert_eq!(scanner.statistics().unreadable_directories, 1);
    }

    #[test]
    fn test_excluded_file_is_exact() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        File::create(dir.path().join("notes.md")).unwrap();
        File::create(dir.path().join("docs").join("notes.md")).unwrap();

        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden())
            .with_excluded_file(&dir.path().join("notes.md"));
        let files = scanner.collect_files();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("docs").join("notes.md"));
        assert_eq!(scanner.statistics().entries_ignored, 0);

        let names: Vec<String> = scanner
            .list_entries(dir.path())
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["docs"]);
    }

    #[test]
    fn test_excluded_file_outside_root() {
        let outside = tempdir().unwrap();
        let dir = tempdir().unwrap();
        File::create(dir.path().join("notes.md")).unwrap();
        File::create(outside.path().join("notes.md")).unwrap();

        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden())
            .with_excluded_file(&outside.path().join("notes.md"));

        assert_eq!(scanner.collect_files().len(), 1);
    }

    #[test]
    fn test_undecodable_file_is_skipped() {
        let dir = tempdir().unwrap();
        let mut bin = File::create(dir.path().join("blob.dat")).unwrap();
        bin.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();
        let mut text = File::create(dir.path().join("notes.txt")).unwrap();
        write!(text, "hello").unwrap();

        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden());
        let files = scanner.collect_files();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("notes.txt"));
        assert_eq!(files[0].content, "hello");
        assert_eq!(files[0].size_bytes, 5);
        assert_eq!(files[0].extension, ".txt");

        let stats = scanner.statistics();
        assert_eq!(stats.files_collected, 1);
        assert_eq!(stats.skipped_unreadable, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_links_are_not_followed() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        File::create(dir.path().join("real").join("f.txt")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("real").join("loop")).unwrap();

        let config = ExportConfig::default();
        let scanner = Scanner::new(dir.path(), &config, hidden());
        let files = scanner.collect_files();

        assert_eq!(files.len(), 1);
        let listing = scanner.list_entries(&dir.path().join("real"));
        assert_eq!(listing[0].name, "loop");
        assert!(listing[0].is_dir());
        assert!(!listing[0].can_descend());
    }
}
