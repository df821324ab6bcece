/*!
 * Configuration handling for mdexport
 *
 * `ExportConfig` is the immutable value every pipeline component reads.
 * It is assembled from defaults, an optional JSON config file and finally
 * the command-line overrides held in `Args`.
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use clap_complete::Shell;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ExportError, Result, ResultExt};
use crate::pattern::Pattern;
use crate::utils::{DEFAULT_IGNORE_EXTENSIONS, DEFAULT_IGNORE_NAMES, DEFAULT_MAX_FILE_SIZE};
use crate::{bail, ensure};

/// Config file looked up in the scan root
pub const CONFIG_FILE_NAME: &str = ".mdexport.json";

/// Default output document name
pub const DEFAULT_OUTPUT_NAME: &str = "project-files.md";

/// Command-line arguments for mdexport
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "mdexport",
    version = env!("CARGO_PKG_VERSION"),
    about = "Export the text files of a directory tree into a single Markdown document",
    long_about = "Collects every text file under a directory and writes them, together with a directory map and size statistics, into one Markdown document."
)]
pub struct Args {
    /// Directory to export
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output Markdown file name
    #[clap(default_value = DEFAULT_OUTPUT_NAME)]
    pub output_file: String,

    /// Path to a JSON config file
    #[clap(long, value_name = "FILE")]
    pub config: Option<String>,

    /// Comma-separated list of name patterns to ignore (added to the configured ones)
    #[clap(long, value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Comma-separated list of extensions to ignore (added to the configured ones)
    #[clap(long, value_delimiter = ',')]
    pub ignore_extensions: Vec<String>,

    /// Only export files directly inside the directory
    #[clap(long)]
    pub no_recursive: bool,

    /// Leave out the directory structure section
    #[clap(long)]
    pub no_structure: bool,

    /// Leave out the file statistics section
    #[clap(long)]
    pub no_stats: bool,

    /// Skip files larger than this many bytes (0 disables the limit)
    #[clap(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Directory to write the document to (defaults to the exported directory)
    #[clap(long, value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Number of threads to use for reading files
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Print debug diagnostics
    #[clap(long, short)]
    pub verbose: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Inclusion rules and document options for one export
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Name patterns matched against basenames and every path segment
    #[serde(alias = "ignore")]
    pub ignore_names: Vec<String>,

    /// Lowercased extensions with a leading dot
    pub ignore_extensions: Vec<String>,

    /// Descend into subdirectories
    pub recursive: bool,

    /// Emit the directory structure section
    pub include_structure: bool,

    /// Emit the file statistics section
    pub include_stats: bool,

    /// Files above this size are skipped; 0 means unlimited
    #[serde(alias = "maxFileSize")]
    pub max_file_size_bytes: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ignore_names: DEFAULT_IGNORE_NAMES.iter().map(|s| s.to_string()).collect(),
            ignore_extensions: DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recursive: true,
            include_structure: true,
            include_stats: true,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Bring an extension into `.ext` lowercase form
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl ExportConfig {
    /// Parse a config from JSON text. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Load a config from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Resolve the config for an export of `root`.
    ///
    /// An explicit file must exist. Otherwise `<root>/.mdexport.json` and then
    /// the user-level `mdexport/config.json` are tried before the defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            ensure!(
                path.is_file(),
                PathNotFound,
                "Config file not found: {}",
                path.display()
            );
            return Self::from_file(path);
        }

        let candidates = [
            Some(root.join(CONFIG_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join("mdexport").join("config.json")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                debug!("Using config file {}", path.display());
                return Self::from_file(&path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Normalize extensions and drop duplicate entries
    pub fn normalized(mut self) -> Self {
        let mut names = Vec::with_capacity(self.ignore_names.len());
        for name in self.ignore_names.drain(..) {
            push_unique(&mut names, name);
        }
        self.ignore_names = names;

        let mut exts = Vec::with_capacity(self.ignore_extensions.len());
        for ext in self.ignore_extensions.drain(..) {
            push_unique(&mut exts, normalize_extension(&ext));
        }
        self.ignore_extensions = exts;

        self
    }

    /// Layer command-line overrides on top of this config
    pub fn apply_args(mut self, args: &Args) -> Self {
        self.ignore_names.extend(args.ignore.iter().cloned());
        self.ignore_extensions
            .extend(args.ignore_extensions.iter().cloned());

        if args.no_recursive {
            self.recursive = false;
        }
        if args.no_structure {
            self.include_structure = false;
        }
        if args.no_stats {
            self.include_stats = false;
        }
        if let Some(limit) = args.max_file_size {
            self.max_file_size_bytes = limit;
        }

        self.normalized()
    }

    /// Reject configurations the pipeline could only silently misinterpret
    pub fn validate(&self) -> Result<()> {
        for name in &self.ignore_names {
            ensure!(!name.is_empty(), Config, "Empty ignore pattern");
            Pattern::parse(name).map_err(|e| {
                ExportError::Config(format!("Invalid ignore pattern {:?}: {}", name, e))
            })?;
        }

        for ext in &self.ignore_extensions {
            ensure!(
                ext.len() > 1 && ext.starts_with('.'),
                Config,
                "Invalid ignore extension {:?}",
                ext
            );
        }

        Ok(())
    }
}

/// Validate the name of the document to write
pub fn validate_output_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!(Config, "Filename cannot be empty");
    }
    if !name.ends_with(".md") {
        bail!(Config, "Filename must end with .md");
    }
    Ok(())
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to export
    pub target_dir: PathBuf,

    /// Name of the output document
    pub output_name: String,

    /// Full path the document is written to
    pub output_file: PathBuf,

    /// Inclusion rules and document options
    pub export: ExportConfig,

    /// Number of threads to use for reading files
    pub num_threads: usize,

    /// Print debug diagnostics
    pub verbose: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Result<Self> {
        let target_dir = PathBuf::from(&args.directory_path);
        let explicit = args.config.as_ref().map(PathBuf::from);
        let export = ExportConfig::load(&target_dir, explicit.as_deref())?.apply_args(&args);

        let output_dir = args
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| target_dir.clone());

        Ok(Self {
            output_file: output_dir.join(&args.output_file),
            target_dir,
            output_name: args.output_file,
            export,
            num_threads: args.threads,
            verbose: args.verbose,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_output_name(&self.output_name)?;

        ensure!(
            self.target_dir.is_dir(),
            PathNotFound,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        // Check if output file directory exists
        if let Some(parent) = self.output_file.parent() {
            ensure!(
                parent.as_os_str().is_empty() || parent.is_dir(),
                PathNotFound,
                "Output directory not found: {}",
                parent.display()
            );
        }

        ensure!(self.num_threads > 0, InvalidArgument, "--threads must be at least 1");

        self.export.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn parse_args(extra: &[&str]) -> Args {
        let mut argv = vec!["mdexport"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert!(config.ignore_names.contains(&"node_modules".to_string()));
        assert!(config.ignore_extensions.contains(&".png".to_string()));
        assert!(config.recursive);
        assert!(config.include_structure);
        assert!(config.include_stats);
        assert_eq!(config.max_file_size_bytes, 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ExportConfig::from_json_str(
            r#"{ "ignore": ["out", "*.log"], "ignoreExtensions": ["PNG", ".Jpg"], "maxFileSize": 0 }"#,
        )
        .unwrap();

        assert_eq!(config.ignore_names, vec!["out", "*.log"]);
        assert_eq!(config.ignore_extensions, vec![".png", ".jpg"]);
        assert_eq!(config.max_file_size_bytes, 0);
        assert!(config.recursive);
        assert!(config.include_stats);
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let config = ExportConfig::from_json_str(
            r#"{ "ignoreNames": ["tmp"], "recursive": false, "includeStructure": false, "includeStats": false, "maxFileSizeBytes": 10 }"#,
        )
        .unwrap();

        assert_eq!(config.ignore_names, vec!["tmp"]);
        assert!(!config.recursive);
        assert!(!config.include_structure);
        assert!(!config.include_stats);
        assert_eq!(config.max_file_size_bytes, 10);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ExportConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ExportError::Json(_)));
    }

    #[test]
    fn test_load_prefers_root_config_file() {
        let dir = tempdir().unwrap();
        let mut file = File::create(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, r#"{{ "ignore": ["generated"] }}"#).unwrap();

        let config = ExportConfig::load(dir.path(), None).unwrap();
        assert_eq!(config.ignore_names, vec!["generated"]);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = ExportConfig::load(dir.path(), Some(&missing)).unwrap_err();
        assert!(matches!(err, ExportError::PathNotFound(_)));
    }

    #[test]
    fn test_apply_args_overrides() {
        let args = parse_args(&[
            "some/dir",
            "out.md",
            "--ignore",
            "target,*.bak",
            "--ignore-extensions",
            "LOCK",
            "--no-recursive",
            "--no-stats",
            "--max-file-size",
            "0",
        ]);

        let config = ExportConfig::default().apply_args(&args);
        assert!(config.ignore_names.contains(&"target".to_string()));
        assert!(config.ignore_names.contains(&"*.bak".to_string()));
        assert!(config.ignore_extensions.contains(&".lock".to_string()));
        assert!(!config.recursive);
        assert!(config.include_structure);
        assert!(!config.include_stats);
        assert_eq!(config.max_file_size_bytes, 0);
    }

    #[test]
    fn test_validate_rejects_bad_extension() {
        let config = ExportConfig {
            ignore_extensions: vec![".".to_string()],
            ..ExportConfig::default()
        };
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));
    }

    #[test]
    fn test_validate_output_name() {
        assert_eq!(
            validate_output_name("").unwrap_err().to_string(),
            "Configuration error: Filename cannot be empty"
        );
        assert_eq!(
            validate_output_name("  ").unwrap_err().to_string(),
            "Configuration error: Filename cannot be empty"
        );
        assert_eq!(
            validate_output_name("test.txt").unwrap_err().to_string(),
            "Configuration error: Filename must end with .md"
        );
        assert!(validate_output_name("test.md").is_ok());
    }

    #[test]
    fn test_config_from_args() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_string_lossy().to_string();
        let args = parse_args(&[&root, "export.md", "--threads", "2"]);

        let config = Config::from_args(args).unwrap();
        assert_eq!(config.output_file, dir.path().join("export.md"));
        assert_eq!(config.num_threads, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_missing_target() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing").to_string_lossy().to_string();
        let out = dir.path().to_string_lossy().to_string();
        let args = parse_args(&[&missing, "export.md", "--output-dir", &out]);

        let config = Config::from_args(args).unwrap();
        assert!(matches!(config.validate(), Err(ExportError::PathNotFound(_))));
    }
}
