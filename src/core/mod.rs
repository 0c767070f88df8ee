pub mod error;
pub mod exporter;
pub mod rules;
pub mod scanner;
pub mod selection;

use std::path::PathBuf;

/// One node of the scanned project tree.
///
/// Nodes are immutable after construction: exclusion is decided once by the
/// classifier at build time and never recomputed. Directory nodes always have
/// `is_excluded = false` and `size = 0`; a directory whose *name* is excluded
/// is skipped during the walk and never becomes a node at all.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_excluded: bool,
    /// Byte size for files, 0 for directories. Best-effort: a failed
    /// metadata read contributes zero rather than an error.
    pub size: u64,
    pub children: Vec<FileNode>,
}

impl FileNode {
    pub fn new_dir(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            is_dir: true,
            is_excluded: false,
            size: 0,
            children: Vec::new(),
        }
    }

    pub fn new_file(name: String, path: PathBuf, is_excluded: bool, size: u64) -> Self {
        Self {
            name,
            path,
            is_dir: false,
            is_excluded,
            size,
            children: Vec::new(),
        }
    }
}

/// The result of one completed scan, produced atomically by the tree builder.
///
/// The whole tree is owned by this struct and replaced wholesale on the next
/// scan; there is no incremental patching.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub root: FileNode,
    pub included_count: usize,
    pub excluded_count: usize,
    pub total_size: u64,
}

pub use error::CoreError;
pub use exporter::Exporter;
pub use rules::{classify, RuleSet, Verdict};
pub use scanner::TreeBuilder;
pub use selection::{SelectionModel, SelectionStats};
