//! Built-in exclusion tables, applied regardless of ignore patterns.

/// File-name suffixes that are never emitted: images, media, and
/// lockfile-like or generated config formats. Compared against the
/// lowercase file name, so compound suffixes such as `.config.ts` work.
pub const SKIP_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg",
    ".jpeg",
    ".png",
    ".gif",
    ".bmp",
    ".tiff",
    ".svg",
    ".ico",
    ".webp",
    // Media
    ".mp3",
    ".mp4",
    ".wav",
    ".mov",
    ".avi",
    // Config / lockfile-like
    ".config",
    ".config.ts",
    ".config.mjs",
    ".ini",
    ".yaml",
    ".yml",
    ".toml",
    ".json",
    ".lock",
];

/// Dependency, vendor, temp and log directories. Any path segment equal to
/// one of these prunes the directory.
pub const BUILTIN_SKIP_DIRS: &[&str] = &["node_modules", "vendor", "tmp", "temp", "log", "logs"];

/// Binary-output directories: files anywhere beneath one are never emitted.
pub const BINARY_OUTPUT_DIRS: &[&str] = &["bin"];

/// Well-known generated database files.
pub const GENERATED_DB_FILES: &[&str] = &["db.sqlite3", "db.sqlite", "database.sqlite", "dump.rdb"];

/// Skip-extension entry matching `file_name`, if any.
pub fn skipped_extension(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    SKIP_EXTENSIONS.iter().copied().find(|ext| lower.ends_with(ext))
}

/// Built-in directory rule matching any segment of `relative_path`.
pub fn builtin_dir_rule(relative_path: &str) -> Option<&'static str> {
    relative_path
        .split('/')
        .find_map(|segment| BUILTIN_SKIP_DIRS.iter().copied().find(|dir| *dir == segment))
}

/// Built-in file rule matching `relative_path`, if any.
pub fn builtin_file_rule(relative_path: &str, file_name: &str) -> Option<&'static str> {
    let mut segments: Vec<&str> = relative_path.split('/').collect();
    segments.pop();
    let under_binary_dir = segments
        .iter()
        .find_map(|segment| BINARY_OUTPUT_DIRS.iter().copied().find(|dir| dir == segment));
    if under_binary_dir.is_some() {
        return under_binary_dir;
    }
    GENERATED_DB_FILES.iter().copied().find(|db| *db == file_name)
}
