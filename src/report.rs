/*!
 * Reporting functionality for mdexport
 *
 * Prints a console summary of an export using the tabled library for
 * clean, consistent table rendering.
 */

use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::document::{extension_stats, NO_EXTENSION};
use crate::export::ExportOutcome;
use crate::scanner::ScanStatistics;
use crate::types::ExtensionStat;
use crate::utils::format_file_size;

/// Extension rows shown before the table is cut off
const MAX_EXTENSION_ROWS: usize = 10;

/// Statistics for an export run
#[derive(Debug, Clone)]
pub struct ExportReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan, assemble and write
    pub duration: Duration,
    /// Number of files exported
    pub files_exported: usize,
    /// Total size of exported files in bytes
    pub total_bytes: u64,
    /// Size of the written document in bytes
    pub document_bytes: usize,
    /// Per-extension breakdown, most common first
    pub extensions: Vec<ExtensionStat>,
    /// Scanner counters
    pub statistics: ScanStatistics,
}

impl ExportReport {
    /// Build a report from an export outcome
    pub fn from_outcome(outcome: &ExportOutcome, output_file: &str, duration: Duration) -> Self {
        Self {
            output_file: output_file.to_string(),
            duration,
            files_exported: outcome.files.len(),
            total_bytes: outcome.files.iter().map(|f| f.size_bytes).sum(),
            document_bytes: outcome.document.len(),
            extensions: extension_stats(&outcome.files),
            statistics: outcome.statistics,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for export results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &ExportReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &ExportReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));
        table.to_string()
    }

    // Create a summary table using the tabled crate
    fn create_summary_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let skipped = stats.skipped_too_large + stats.skipped_unreadable;

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Exported".to_string(),
                value: report.files_exported.to_string(),
            },
            SummaryRow {
                key: "📦 Source Size".to_string(),
                value: format_file_size(report.total_bytes),
            },
            SummaryRow {
                key: "📝 Document Size".to_string(),
                value: format_file_size(report.document_bytes as u64),
            },
            SummaryRow {
                key: "🚫 Ignored Entries".to_string(),
                value: stats.entries_ignored.to_string(),
            },
        ];

        if skipped > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Skipped Files".to_string(),
                value: format!(
                    "{} ({} too large, {} unreadable)",
                    skipped, stats.skipped_too_large, stats.skipped_unreadable
                ),
            });
        }

        if stats.unreadable_directories > 0 {
            rows.push(SummaryRow {
                key: "⚠️ Unreadable Dirs".to_string(),
                value: stats.unreadable_directories.to_string(),
            });
        }

        Self::style(&mut Table::new(rows))
    }

    // Create an extension table using the tabled crate
    fn create_extensions_table(&self, report: &ExportReport) -> String {
        #[derive(Tabled)]
        struct ExtensionRow {
            #[tabled(rename = "Extension")]
            extension: String,

            #[tabled(rename = "Files")]
            files: usize,

            #[tabled(rename = "Total Size")]
            size: String,
        }

        let rows: Vec<ExtensionRow> = report
            .extensions
            .iter()
            .take(MAX_EXTENSION_ROWS)
            .map(|stat| ExtensionRow {
                extension: if stat.extension.is_empty() {
                    NO_EXTENSION.to_string()
                } else {
                    stat.extension.clone()
                },
                files: stat.file_count,
                size: format_file_size(stat.total_bytes),
            })
            .collect();

        Self::style(&mut Table::new(rows))
    }

    // Generate a console table report
    fn generate_console_report(&self, report: &ExportReport) -> String {
        let summary_title = "✅  EXPORT COMPLETE";
        let files_title = if report.extensions.len() > MAX_EXTENSION_ROWS {
            format!("📋  TOP {} FILE TYPES", MAX_EXTENSION_ROWS)
        } else {
            "📋  FILE TYPES".to_string()
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title,
            self.create_extensions_table(report),
            summary_title,
            self.create_summary_table(report)
        )
    }
}
