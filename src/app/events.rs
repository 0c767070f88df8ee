//! Defines the events the engine sends to the presentation layer.

use std::path::PathBuf;

use crate::core::ScanResult;

/// Events delivered from the engine to the presentation layer.
///
/// All outbound information crosses through a single ordered channel carrying
/// this enum; the presentation layer drains it on its own schedule and never
/// shares mutable state with the scan worker.
#[derive(Debug)]
pub enum UserEvent {
    /// A monotonically increasing processed-entry count for the running scan.
    ScanProgress(usize),
    /// A human-readable status line ("Scanning in progress...", etc.).
    Status(String),
    /// The completed result of the current scan generation.
    ScanComplete(Box<ScanResult>),
    /// A user-facing, recoverable error message.
    Error(String),
    /// An export artifact was written to the given destination.
    ExportComplete(PathBuf),
}
