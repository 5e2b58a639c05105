//! Markdown document emitter
//!
//! Each accepted file becomes a heading carrying its relative path followed
//! by a fenced block holding the raw content:
//!
//! ````text
//!
//! # src/app.py
//! ```python
//! print(1)
//! ```
//! ````

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use super::DocumentSink;
use crate::domain::fence_language;
use crate::error::{Error, Result};

pub struct MarkdownEmitter<W: Write> {
    writer: W,
    entries: usize,
}

impl MarkdownEmitter<File> {
    /// Open `path` for appending, creating it if absent. Existing content is kept.
    pub fn append_to(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::OutputOpen { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), "Opened output document");
        Ok(Self::new(file))
    }
}

impl<W: Write> MarkdownEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, entries: 0 }
    }

    /// Number of entries written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Flush and hand back the writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer
            .flush()
            .map_err(|source| Error::Write { path: "<flush>".to_string(), source })?;
        Ok(self.writer)
    }

    fn put(&mut self, relative_path: &str, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|source| Error::Write { path: relative_path.to_string(), source })
    }
}

impl<W: Write> DocumentSink for MarkdownEmitter<W> {
    fn write_entry(&mut self, relative_path: &str, content: &[u8]) -> Result<()> {
        let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        let language = fence_language(file_name);

        self.put(relative_path, format!("\n# {relative_path}\n").as_bytes())?;
        self.put(relative_path, format!("```{language}\n").as_bytes())?;
        self.put(relative_path, content)?;
        self.put(relative_path, b"\n```\n")?;

        self.entries += 1;
        Ok(())
    }
}
