//! Ignore-pattern matching and path classification.
//!
//! Patterns follow a deliberately small subset of ignore-file syntax:
//!
//! - a trailing `/` restricts the pattern to directories;
//! - a pattern containing `/` anywhere is anchored at the traversal root and
//!   matched against the full relative path, otherwise it is matched against
//!   the base name at any depth;
//! - `*`, `?`, `[...]` and `{a,b}` are supported and `*` never crosses `/`;
//! - `**` has no recursive meaning and behaves like `*`;
//! - `!` negation is not supported, a leading `!` is matched literally.
//!
//! Nothing in this module touches the filesystem except [`IgnoreRules::load`].

use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

use super::rules::{builtin_dir_rule, builtin_file_rule, skipped_extension};
use crate::domain::{Decision, SkipReason};

/// One compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct IgnorePattern {
    raw: String,
    matcher: GlobMatcher,
    dir_only: bool,
    anchored: bool,
}

impl IgnorePattern {
    /// Compile a single ignore-file line.
    ///
    /// Returns `None` for blank lines, comments, a bare `/`, and globs that
    /// fail to compile (logged at WARN).
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        let body = trimmed.trim_start_matches('/').trim_end_matches('/');
        if body.is_empty() {
            return None;
        }

        let glob = collapse_double_star(body);
        match GlobBuilder::new(&glob).literal_separator(true).backslash_escape(true).build() {
            Ok(compiled) => Some(Self {
                raw: trimmed.to_string(),
                matcher: compiled.compile_matcher(),
                dir_only: trimmed.ends_with('/'),
                anchored: trimmed.contains('/'),
            }),
            Err(err) => {
                warn!(pattern = %trimmed, error = %err, "Dropping unparseable ignore pattern");
                None
            }
        }
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    fn matches(&self, relative_path: &str, name: &str) -> bool {
        if self.anchored {
            self.matcher.is_match(relative_path)
        } else {
            self.matcher.is_match(name)
        }
    }
}

/// `**` is not recursive here; fold any run of stars into one.
fn collapse_double_star(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len());
    let mut prev_star = false;
    let mut chars = glob.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            // an escaped star is literal and never folds
            out.push(ch);
            out.extend(chars.next());
            prev_star = false;
            continue;
        }
        if ch == '*' && prev_star {
            continue;
        }
        prev_star = ch == '*';
        out.push(ch);
    }
    out
}

/// The set of ignore patterns loaded for one run.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreRules {
    /// Build rules from ignore-file lines; blanks and comments are dropped.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns =
            lines.into_iter().filter_map(|line| IgnorePattern::parse(line.as_ref())).collect();
        Self { patterns }
    }

    /// Read `ignore_file` from `root`.
    ///
    /// A missing, unreadable or non-UTF-8 file yields an empty rule set.
    pub fn load(root: &Path, ignore_file: &str) -> Self {
        let path = root.join(ignore_file);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let rules = Self::new(content.lines());
                debug!(path = %path.display(), patterns = rules.len(), "Loaded ignore file");
                rules
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No ignore file");
                Self::default()
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Ignore file unreadable, using no patterns");
                Self::default()
            }
        }
    }

    /// Append extra patterns (e.g. from config or `--exclude`).
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns
            .extend(lines.into_iter().filter_map(|line| IgnorePattern::parse(line.as_ref())));
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// First pattern excluding the directory at `relative_path`.
    pub fn dir_match(&self, relative_path: &str) -> Option<&str> {
        let name = base_name(relative_path);
        self.patterns.iter().find(|p| p.matches(relative_path, name)).map(IgnorePattern::as_str)
    }

    /// First file-applicable pattern excluding the file at `relative_path`.
    pub fn file_match(&self, relative_path: &str, name: &str) -> Option<&str> {
        self.patterns
            .iter()
            .filter(|p| !p.is_dir_only())
            .find(|p| p.matches(relative_path, name))
            .map(IgnorePattern::as_str)
    }

    /// Whether the walker must prune the directory at `relative_path`.
    pub fn should_skip_dir(&self, relative_path: &str) -> bool {
        builtin_dir_rule(relative_path).is_some() || self.dir_match(relative_path).is_some()
    }

    /// Whether the file at `relative_path` is excluded by patterns or built-in rules.
    pub fn should_skip_file(&self, relative_path: &str, name: &str) -> bool {
        builtin_file_rule(relative_path, name).is_some()
            || self.file_match(relative_path, name).is_some()
    }
}

fn base_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// Classify one node below the traversal root.
///
/// `relative_path` uses `/` separators. The root itself is never passed in.
pub fn classify(relative_path: &str, is_dir: bool, rules: &IgnoreRules) -> Decision {
    let name = base_name(relative_path);
    if name.starts_with('.') {
        return Decision::Exclude(SkipReason::Hidden);
    }

    if is_dir {
        if let Some(rule) = builtin_dir_rule(relative_path) {
            return Decision::Exclude(SkipReason::Builtin(rule));
        }
        return match rules.dir_match(relative_path) {
            Some(pattern) => Decision::Exclude(SkipReason::Pattern(pattern.to_string())),
            None => Decision::Include,
        };
    }

    if let Some(rule) = builtin_file_rule(relative_path, name) {
        return Decision::Exclude(SkipReason::Builtin(rule));
    }
    if let Some(ext) = skipped_extension(name) {
        return Decision::Exclude(SkipReason::Extension(ext));
    }
    match rules.file_match(relative_path, name) {
        Some(pattern) => Decision::Exclude(SkipReason::Pattern(pattern.to_string())),
        None => Decision::Include,
    }
}
