/*!
 * Export pipeline: scan, render the tree, assemble the document
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use tracing::info;

use crate::config::ExportConfig;
use crate::document::DocumentAssembler;
use crate::scanner::{ScanStatistics, Scanner};
use crate::tree::TreeRenderer;
use crate::types::FileRecord;

/// Result of one export run
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    /// The assembled Markdown document
    pub document: String,
    /// Files included in the document, in document order
    pub files: Vec<FileRecord>,
    /// Scanner counters
    pub statistics: ScanStatistics,
    /// Time spent scanning and assembling
    pub duration: Duration,
}

/// Label used for the root in the document: its final path component
pub fn root_label(root: &Path) -> String {
    root.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(root)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}

/// Runs the export pipeline for one configuration
pub struct Exporter {
    config: ExportConfig,
    progress: Arc<ProgressBar>,
    output_file: Option<PathBuf>,
}

impl Exporter {
    /// Create an exporter
    pub fn new(config: ExportConfig, progress: Arc<ProgressBar>) -> Self {
        Self {
            config,
            progress,
            output_file: None,
        }
    }

    /// Where the document is going to be written. Defaults to
    /// `output_name` directly inside the root.
    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Export `root` into a document named `output_name`.
    ///
    /// The output file itself is left out when it lies below the root, so
    /// re-running an export does not pick up the previous document. Other
    /// files are unaffected, even when they share its name.
    pub fn export(&self, root: &Path, output_name: &str) -> ExportOutcome {
        let start = Instant::now();
        let output_file = self
            .output_file
            .clone()
            .unwrap_or_else(|| root.join(output_name));

        let scanner = Scanner::new(root, &self.config, Arc::clone(&self.progress))
            .with_excluded_file(&output_file);

        self.progress.set_prefix("Scanning");
        let files = scanner.collect_files();
        info!("Collected {} files from {}", files.len(), root.display());

        self.progress.set_prefix("Rendering");
        let tree = TreeRenderer::new(&scanner).render();

        let label = root_label(root);
        let document = DocumentAssembler::new(&self.config).assemble(
            &label,
            &files,
            output_name,
            Some(&tree),
        );

        ExportOutcome {
            document,
            files,
            statistics: scanner.statistics(),
            duration: start.elapsed(),
        }
    }
}
