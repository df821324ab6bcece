//! Fence language tags for the file contents section

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Tag used for extensions missing from the table
pub const FALLBACK_LANGUAGE: &str = "plaintext";

/// Extension (lowercase, leading dot) to fence language tag
static LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".js", "javascript"),
        (".jsx", "jsx"),
        (".ts", "typescript"),
        (".tsx", "tsx"),
        (".html", "html"),
        (".css", "css"),
        (".scss", "scss"),
        (".json", "json"),
        (".md", "markdown"),
        (".py", "python"),
        (".java", "java"),
        (".c", "c"),
        (".cpp", "cpp"),
        (".go", "go"),
        (".rs", "rust"),
        (".php", "php"),
        (".sh", "bash"),
        (".sql", "sql"),
        (".xml", "xml"),
        (".yaml", "yaml"),
        (".yml", "yaml"),
    ])
});

/// Resolve the fence tag for an extension such as `.rs`
pub fn language_for(extension: &str) -> &'static str {
    LANGUAGES
        .get(extension)
        .copied()
        .unwrap_or(FALLBACK_LANGUAGE)
}
