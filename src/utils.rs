/*!
 * Utility functions for mdexport
 */

use std::cmp::Ordering;

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if size < KB {
        format!("{} bytes", size)
    } else if size < MB {
        format!("{:.1} KB", size as f64 / KB as f64)
    } else {
        format!("{:.1} MB", size as f64 / MB as f64)
    }
}

/// Case-folding comparison used for every user-visible ordering.
///
/// Names compare by their lowercase form first; names that only differ in
/// case fall back to a plain comparison so the order stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded.then_with(|| a.cmp(b))
}

/// Default name patterns to ignore
pub static DEFAULT_IGNORE_NAMES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "node_modules",
        ".git",
        ".next",
        "dist",
        "build",
        "coverage",
        ".env",
        ".DS_Store",
        "Thumbs.db",
        ".vercel",
    ]
});

/// Default extensions to ignore
pub static DEFAULT_IGNORE_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Images
        ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".webp",
        // Documents & archives
        ".pdf", ".zip", ".rar", ".7z",
        // Fonts
        ".ttf", ".woff", ".woff2",
    ]
});

/// Default maximum file size (1 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
