//! Error types for tree operations.
//!
//! All fallible functions in this crate return [`Result<T>`], which uses
//! [`Error`] as the error type. `std::io::Error` converts via `From`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when accessing a tree source.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed (opening files, listing directories, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested path exists in no mounted source.
    #[error("path not found: {0}")]
    NotFound(String),

    /// The path resolved to a directory where a file was required.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// The path resolved to a file where a directory was required.
    #[error("not a directory: {0}")]
    NotADirectory(String),

    /// A write operation was attempted on a source that cannot accept writes.
    #[error("source is read-only: {0}")]
    ReadOnly(String),
}
