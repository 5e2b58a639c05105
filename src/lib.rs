//! repo-to-md: concatenate a repository into one Markdown document
//!
//! Walks a directory tree (or a freshly cloned Git repository), filters out
//! hidden, ignored, binary-ish and generated files, and appends every
//! remaining file to a Markdown document as a heading plus fenced code block.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod render;
pub mod scan;
pub mod utils;

pub use error::{Error, Result};
