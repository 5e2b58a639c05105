//! Error taxonomy for an export run.
//!
//! Every variant is fatal for the run. The CLI maps each class onto a
//! distinct process exit code via [`Error::exit_code`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Directory '{}' does not exist", .0.display())]
    RootNotFound(PathBuf),

    #[error("'{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Config file '{}' not found", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Failed to open or create the output file '{}': {source}", .path.display())]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk '{}': {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write entry for '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to clone '{url}': {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to create temporary clone directory: {0}")]
    TempDir(#[source] io::Error),
}

impl Error {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::RootNotFound(_)
            | Error::NotADirectory(_)
            | Error::ConfigNotFound(_)
            | Error::Config(_) => 2,
            Error::OutputOpen { .. } => 3,
            Error::Walk { .. } | Error::Read { .. } | Error::Write { .. } => 4,
            Error::Clone { .. } | Error::TempDir(_) => 5,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
