/*!
 * Directory tree rendering
 */

use std::path::Path;

use crate::scanner::Scanner;

/// Connector for an entry that has siblings below it
pub const BRANCH: &str = "├── ";
/// Connector for the last entry of a directory
pub const LAST_BRANCH: &str = "└── ";
/// Indentation under an entry that has siblings below it
pub const PIPE_INDENT: &str = "│   ";
/// Indentation under the last entry of a directory
pub const SPACE_INDENT: &str = "    ";

/// Renders the filtered directory tree as connector-prefixed lines
pub struct TreeRenderer<'s, 'a> {
    scanner: &'s Scanner<'a>,
}

impl<'s, 'a> TreeRenderer<'s, 'a> {
    /// Create a renderer sharing the scanner's root and ignore rules
    pub fn new(scanner: &'s Scanner<'a>) -> Self {
        Self { scanner }
    }

    /// Render the tree below the scan root, one line per entry.
    ///
    /// Returns no lines when the structure section is disabled.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.scanner.config().include_structure {
            self.render_directory(self.scanner.root(), "", &mut lines);
        }
        lines
    }

    fn render_directory(&self, dir: &Path, prefix: &str, lines: &mut Vec<String>) {
        let entries = self.scanner.list_entries(dir);
        let count = entries.len();

        for (index, entry) in entries.iter().enumerate() {
            let is_last = index + 1 == count;
            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{}{}{}", prefix, connector, entry.name));

            if entry.can_descend() && self.scanner.config().recursive {
                let indent = if is_last { SPACE_INDENT } else { PIPE_INDENT };
                self.render_directory(&entry.path, &format!("{}{}", prefix, indent), lines);
            }
        }
    }
}
