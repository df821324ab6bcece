/*!
 * mdexport - Export the text files of a directory tree into one Markdown document
 *
 * The library walks a directory with configurable ignore rules, renders a
 * tree map of what it kept, and assembles file contents, the map and size
 * statistics into a single Markdown report.
 */

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod language;
pub mod pattern;
pub mod report;
pub mod scanner;
pub mod tree;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{Config, ExportConfig};
pub use document::DocumentAssembler;
pub use error::{ExportError, Result};
pub use export::{ExportOutcome, Exporter};
pub use pattern::matches;
pub use report::{ExportReport, ReportFormat, Reporter};
pub use scanner::{ScanStatistics, Scanner};
pub use tree::TreeRenderer;
pub use types::{ExtensionStat, FileRecord};
pub use utils::format_file_size;
pub use writer::DocumentWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
