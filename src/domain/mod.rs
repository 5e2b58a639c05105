//! Core domain types and models
//!
//! Defines the run configuration, per-run statistics, the classification
//! verdict shared by the matcher and walker, and the extension → fence
//! language table.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Report schema version written by `--report`
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Ignore file read from the traversal root when none is configured
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// What to do when an included file cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadErrorPolicy {
    /// Stop the whole run on the first unreadable file
    #[default]
    Abort,
    /// Log a warning, count the file as unreadable, keep walking
    Skip,
}

/// Why a path was left out of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Base name starts with a dot
    Hidden,
    /// Built-in directory or file rule (dependency dirs, binary output, generated DBs)
    Builtin(&'static str),
    /// Extension listed in the skip-extension set
    Extension(&'static str),
    /// Ignore pattern, as written in the ignore file or config
    Pattern(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Hidden => write!(f, "hidden"),
            SkipReason::Builtin(rule) => write!(f, "built-in rule '{rule}'"),
            SkipReason::Extension(ext) => write!(f, "skipped extension '{ext}'"),
            SkipReason::Pattern(pattern) => write!(f, "ignore pattern '{pattern}'"),
        }
    }
}

/// Inclusion verdict for a single directory or file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Include,
    Exclude(SkipReason),
}

/// Statistics from walking and emitting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Directories pruned (never descended into)
    pub dirs_skipped: usize,

    /// Files emitted into the document
    pub files_included: usize,

    /// Files skipped because their name starts with a dot
    #[serde(default)]
    pub files_skipped_hidden: usize,

    /// Files skipped by built-in rules
    #[serde(default)]
    pub files_skipped_builtin: usize,

    /// Files skipped due to the skip-extension set
    #[serde(default)]
    pub files_skipped_extension: usize,

    /// Files skipped due to ignore patterns
    #[serde(default)]
    pub files_skipped_pattern: usize,

    /// Files that could not be read (only with the `skip` read-error policy)
    #[serde(default)]
    pub files_unreadable: usize,

    /// Total bytes of file content written
    pub total_bytes_included: u64,

    /// Processing time in seconds
    #[serde(default)]
    pub processing_time_seconds: f64,
}

impl ScanStats {
    /// Count a skipped file under its reason.
    pub fn record_file_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::Hidden => self.files_skipped_hidden += 1,
            SkipReason::Builtin(_) => self.files_skipped_builtin += 1,
            SkipReason::Extension(_) => self.files_skipped_extension += 1,
            SkipReason::Pattern(_) => self.files_skipped_pattern += 1,
        }
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped_hidden
            + self.files_skipped_builtin
            + self.files_skipped_extension
            + self.files_skipped_pattern
    }

    /// JSON shape written by `--report`, with skip counts nested by reason.
    pub fn to_report_value(&self) -> serde_json::Value {
        serde_json::json!({
            "schema_version": REPORT_SCHEMA_VERSION,
            "dirs_skipped": self.dirs_skipped,
            "files_included": self.files_included,
            "files_skipped": {
                "hidden":    self.files_skipped_hidden,
                "builtin":   self.files_skipped_builtin,
                "extension": self.files_skipped_extension,
                "pattern":   self.files_skipped_pattern,
            },
            "files_unreadable": self.files_unreadable,
            "total_bytes_included": self.total_bytes_included,
            "processing_time_seconds": self.processing_time_seconds,
        })
    }
}

/// Accepts a comma-separated string or a sequence of globs.
fn deserialize_globs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct GlobsVisitor;

    impl<'de> Visitor<'de> for GlobsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of glob patterns")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value
                .split(',')
                .map(str::trim)
                .filter(|glob| !glob.is_empty())
                .map(str::to_string)
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut result = Vec::new();
            while let Some(glob) = seq.next_element::<String>()? {
                let trimmed = glob.trim();
                if !trimmed.is_empty() {
                    result.push(trimmed.to_string());
                }
            }
            Ok(result)
        }
    }

    deserializer.deserialize_any(GlobsVisitor)
}

/// Main configuration for repo-to-md
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Branch or tag to clone when the root is a remote URL
    #[serde(default, rename = "ref")]
    pub ref_: Option<String>,

    /// Ignore file name, looked up in the traversal root
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Extra ignore patterns, same syntax as ignore-file lines
    #[serde(default, deserialize_with = "deserialize_globs")]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub follow_symlinks: bool,

    #[serde(default)]
    pub on_read_error: ReadErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ref_: None,
            ignore_file: default_ignore_file(),
            exclude: Vec::new(),
            follow_symlinks: false,
            on_read_error: ReadErrorPolicy::Abort,
        }
    }
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

static FENCE_LANGUAGES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".py", "python"),
        (".pyi", "python"),
        (".js", "javascript"),
        (".jsx", "jsx"),
        (".mjs", "javascript"),
        (".cjs", "javascript"),
        (".ts", "typescript"),
        (".tsx", "tsx"),
        (".go", "go"),
        (".java", "java"),
        (".kt", "kotlin"),
        (".kts", "kotlin"),
        (".rs", "rust"),
        (".c", "c"),
        (".h", "c"),
        (".cpp", "cpp"),
        (".hpp", "cpp"),
        (".cc", "cpp"),
        (".cxx", "cpp"),
        (".cs", "csharp"),
        (".rb", "ruby"),
        (".php", "php"),
        (".swift", "swift"),
        (".scala", "scala"),
        (".sh", "bash"),
        (".bash", "bash"),
        (".zsh", "zsh"),
        (".md", "markdown"),
        (".rst", "rst"),
        (".html", "html"),
        (".css", "css"),
        (".scss", "scss"),
        (".less", "less"),
        (".vue", "vue"),
        (".svelte", "svelte"),
        (".sql", "sql"),
        (".graphql", "graphql"),
        (".proto", "protobuf"),
        (".xml", "xml"),
        (".lua", "lua"),
        (".dart", "dart"),
        (".ex", "elixir"),
        (".exs", "elixir"),
        (".hs", "haskell"),
        (".dockerfile", "dockerfile"),
    ])
});

/// Lowercase extension of `file_name`, with its leading dot.
///
/// Returns an empty string for names without an extension; a leading dot
/// alone (`.bashrc`) does not count as one.
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

/// Fence language tag for a file name; empty when the extension is unmapped.
pub fn fence_language(file_name: &str) -> &'static str {
    FENCE_LANGUAGES.get(extension_of(file_name).as_str()).copied().unwrap_or("")
}
