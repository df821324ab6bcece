/*!
 * Markdown document assembly
 *
 * The assembler is a pure function of its inputs: the sorted file list,
 * the rendered tree lines and the export options. It never touches the
 * filesystem, so the whole document shape can be checked in memory.
 */

use std::fmt::Write;

use chrono::{DateTime, Local};
use indexmap::IndexMap;

use crate::config::ExportConfig;
use crate::language::language_for;
use crate::types::{ExtensionStat, FileRecord};
use crate::utils::format_file_size;

/// Label used in the statistics table for files without an extension
pub const NO_EXTENSION: &str = "(no extension)";

/// Aggregate files per extension.
///
/// Rows are sorted by descending file count; extensions with equal counts
/// keep the order in which they were first seen in `files`.
pub fn extension_stats(files: &[FileRecord]) -> Vec<ExtensionStat> {
    let mut by_extension: IndexMap<&str, ExtensionStat> = IndexMap::new();

    for file in files {
        let stat = by_extension
            .entry(file.extension.as_str())
            .or_insert_with(|| ExtensionStat {
                extension: file.extension.clone(),
                file_count: 0,
                total_bytes: 0,
            });
        stat.file_count += 1;
        stat.total_bytes += file.size_bytes;
    }

    let mut stats: Vec<ExtensionStat> = by_extension.into_values().collect();
    stats.sort_by(|a, b| b.file_count.cmp(&a.file_count));
    stats
}

/// Builds the export document
pub struct DocumentAssembler<'a> {
    config: &'a ExportConfig,
    timestamp: DateTime<Local>,
}

impl<'a> DocumentAssembler<'a> {
    /// Create an assembler stamped with the current local time
    pub fn new(config: &'a ExportConfig) -> Self {
        Self {
            config,
            timestamp: Local::now(),
        }
    }

    /// Use a fixed export time in the header
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Render the complete document.
    ///
    /// `files` is expected to be sorted already; it is emitted in order.
    pub fn assemble(
        &self,
        root_label: &str,
        files: &[FileRecord],
        output_name: &str,
        tree: Option<&[String]>,
    ) -> String {
        let mut doc = String::new();

        self.write_header(&mut doc, root_label, output_name);

        if let Some(lines) = tree.filter(|lines| !lines.is_empty()) {
            if self.config.include_structure {
                self.write_structure(&mut doc, root_label, lines);
            }
        }

        if self.config.include_stats {
            self.write_statistics(&mut doc, files);
        }

        self.write_contents(&mut doc, files);

        doc
    }

    // Writing into a String cannot fail, so the fmt::Results below are ignored.

    fn write_header(&self, doc: &mut String, root_label: &str, output_name: &str) {
        let _ = writeln!(doc, "# Project Files Export\n");
        let _ = writeln!(
            doc,
            "Export time: {}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(doc, "Source directory: `{}`\n", root_label);
        let _ = writeln!(doc, "Output file: `{}`\n", output_name);
    }

    fn write_structure(&self, doc: &mut String, root_label: &str, lines: &[String]) {
        let _ = writeln!(doc, "## Directory Structure\n");
        let _ = writeln!(doc, "```");
        let _ = writeln!(doc, "{}", root_label);
        for line in lines {
            let _ = writeln!(doc, "{}", line);
        }
        let _ = writeln!(doc, "```\n");
    }

    fn write_statistics(&self, doc: &mut String, files: &[FileRecord]) {
        let total_size: u64 = files.iter().map(|f| f.size_bytes).sum();

        let _ = writeln!(doc, "## File Statistics\n");
        let _ = writeln!(doc, "- Total files: {}", files.len());
        let _ = writeln!(doc, "- Total size: {}\n", format_file_size(total_size));

        let stats = extension_stats(files);
        if stats.is_empty() {
            return;
        }

        let _ = writeln!(doc, "### File Type Distribution\n");
        let _ = writeln!(doc, "| Extension | Files | Total Size |");
        let _ = writeln!(doc, "| --- | --- | --- |");
        for stat in &stats {
            let label = if stat.extension.is_empty() {
                NO_EXTENSION
            } else {
                stat.extension.as_str()
            };
            let _ = writeln!(
                doc,
                "| {} | {} | {} |",
                label,
                stat.file_count,
                format_file_size(stat.total_bytes)
            );
        }
        let _ = writeln!(doc);
    }

    fn write_contents(&self, doc: &mut String, files: &[FileRecord]) {
        let _ = writeln!(doc, "## File Contents\n");

        for file in files {
            let path = file.display_path();
            let _ = writeln!(doc, "### {}\n", path);
            let _ = writeln!(doc, "```{}", language_for(&file.extension));
            let _ = writeln!(doc, "// {}", path);
            doc.push_str(&file.content);
            let _ = writeln!(doc, "\n```\n");
        }
    }
}
