//! Defines the custom error type for the `core` module.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates all recoverable failures of the scan and export
/// engine. Nothing here is fatal to the process: per-entry permission errors
/// are absorbed inside the tree builder and never reach this type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The root path handed to a scan does not exist or is not a directory.
    #[error("Path does not exist or is not a directory: {0}")]
    PathNotFound(PathBuf),

    /// A contents export was requested with zero selected files.
    #[error("No files selected")]
    NoSelection,

    /// An export was requested before any scan has completed.
    #[error("No project folder has been scanned")]
    NoProjectSelected,

    /// Represents an I/O error, typically when writing an export artifact.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// The operation was superseded by a newer scan generation.
    #[error("Scan was cancelled")]
    Cancelled,
}
