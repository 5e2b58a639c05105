//! Depth-first tree walker feeding accepted files to a [`DocumentSink`].

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::patterns::{classify, IgnoreRules};
use crate::domain::{Decision, ReadErrorPolicy, ScanStats};
use crate::error::{Error, Result};
use crate::render::DocumentSink;
use crate::utils::relative_path;

/// Walks `root` in lexical order, pruning excluded directories.
pub struct TreeWalker<'a> {
    root: &'a Path,
    rules: &'a IgnoreRules,
    follow_symlinks: bool,
    on_read_error: ReadErrorPolicy,
    skip_path: Option<PathBuf>,
}

impl<'a> TreeWalker<'a> {
    pub fn new(root: &'a Path, rules: &'a IgnoreRules) -> Self {
        Self {
            root,
            rules,
            follow_symlinks: false,
            on_read_error: ReadErrorPolicy::Abort,
            skip_path: None,
        }
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn on_read_error(mut self, policy: ReadErrorPolicy) -> Self {
        self.on_read_error = policy;
        self
    }

    /// Never emit `path`, typically the output document when it lives under the root.
    pub fn skip_path(mut self, path: &Path) -> Self {
        self.skip_path = path.canonicalize().ok();
        self
    }

    /// Walk the tree, forwarding every included file to `sink`.
    ///
    /// Stops at the first walk, read, or sink error; entries already
    /// forwarded stay in the sink.
    pub fn walk<S: DocumentSink>(&self, sink: &mut S, stats: &mut ScanStats) -> Result<()> {
        let mut entries = WalkDir::new(self.root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry.map_err(|source| Error::Walk {
                path: source.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.to_path_buf()),
                source,
            })?;
            if entry.depth() == 0 {
                continue;
            }

            let rel = relative_path(self.root, entry.path());
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if let Decision::Exclude(reason) = classify(&rel, true, self.rules) {
                    debug!(path = %rel, %reason, "Skipping directory");
                    stats.dirs_skipped += 1;
                    entries.skip_current_dir();
                }
                continue;
            }

            // Unfollowed symlinks to regular files are read through; to directories, never entered.
            let is_linked_file = file_type.is_symlink()
                && fs::metadata(entry.path()).map(|meta| meta.is_file()).unwrap_or(false);
            if !file_type.is_file() && !is_linked_file {
                debug!(path = %rel, "Skipping non-regular file");
                continue;
            }

            if self.is_skip_path(entry.path()) {
                debug!(path = %rel, "Skipping output document");
                continue;
            }

            if let Decision::Exclude(reason) = classify(&rel, false, self.rules) {
                debug!(path = %rel, %reason, "Skipping file");
                stats.record_file_skip(&reason);
                continue;
            }

            let content = match fs::read(entry.path()) {
                Ok(content) => content,
                Err(source) => match self.on_read_error {
                    ReadErrorPolicy::Abort => {
                        return Err(Error::Read { path: entry.path().to_path_buf(), source });
                    }
                    ReadErrorPolicy::Skip => {
                        warn!(path = %rel, error = %source, "Skipping unreadable file");
                        stats.files_unreadable += 1;
                        continue;
                    }
                },
            };

            sink.write_entry(&rel, &content)?;
            info!(path = %rel, bytes = content.len(), "Processed file");
            stats.files_included += 1;
            stats.total_bytes_included += content.len() as u64;
        }

        Ok(())
    }

    fn is_skip_path(&self, path: &Path) -> bool {
        let Some(skip) = &self.skip_path else {
            return false;
        };
        if path.file_name() != skip.file_name() {
            return false;
        }
        path.canonicalize().map(|p| &p == skip).unwrap_or(false)
    }
}
