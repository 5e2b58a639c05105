//! Output rendering: the Markdown document and the JSON run report.

pub mod markdown;
pub mod report;

pub use markdown::MarkdownEmitter;
pub use report::write_report;

use crate::error::Result;

/// Consumer of accepted files, fed in traversal order.
pub trait DocumentSink {
    /// Append one file to the document. Any error aborts the traversal.
    fn write_entry(&mut self, relative_path: &str, content: &[u8]) -> Result<()>;
}
