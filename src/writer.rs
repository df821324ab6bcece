/*!
 * Document writer for mdexport
 */

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, ResultExt};

/// Writes the assembled document to disk
pub struct DocumentWriter {
    /// Destination path
    output_file: PathBuf,
}

impl DocumentWriter {
    /// Create a new writer for the given destination
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self {
            output_file: output_file.into(),
        }
    }

    /// Destination path
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Write the document, replacing any previous file at the destination
    pub fn write(&self, document: &str) -> Result<()> {
        let file = File::create(&self.output_file)
            .with_context(|| format!("Failed to create {}", self.output_file.display()))?;
        let mut writer = BufWriter::new(file);

        writer
            .write_all(document.as_bytes())
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to write {}", self.output_file.display()))?;

        info!(
            "Wrote {} bytes to {}",
            document.len(),
            self.output_file.display()
        );
        Ok(())
    }
}
