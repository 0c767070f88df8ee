//! Recursive tree builder: walks a project directory, classifies every entry
//! and produces the in-memory tree a scan hands back to the presentation
//! layer.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use super::rules::{classify, RuleSet, Verdict};
use super::{CoreError, FileNode, ScanResult};

/// How many processed entries between progress callbacks, unless overridden.
const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Builds the project tree for one scan.
///
/// The rule set and the show-excluded flag are fixed for the builder's
/// lifetime; a changed rule set or toggle means a fresh builder and a fresh
/// scan.
pub struct TreeBuilder {
    rules: RuleSet,
    show_excluded: bool,
    progress_interval: usize,
}

impl TreeBuilder {
    pub fn new(rules: RuleSet, show_excluded: bool) -> Self {
        Self {
            rules,
            show_excluded,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Overrides how many processed entries pass between progress callbacks.
    /// Clamped to at least one.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Walks `root_path` recursively and returns the completed [`ScanResult`].
    ///
    /// The cancellation flag is polled at every entry; once set, the walk
    /// unwinds with [`CoreError::Cancelled`] and the partial tree is dropped.
    /// Unreadable subdirectories are treated as empty and the walk continues.
    pub fn build<F>(
        &self,
        root_path: &Path,
        cancel_flag: &AtomicBool,
        progress_callback: F,
    ) -> Result<ScanResult, CoreError>
    where
        F: Fn(usize),
    {
        if !root_path.is_dir() {
            return Err(CoreError::PathNotFound(root_path.to_path_buf()));
        }

        let mut walk = Walk {
            rules: &self.rules,
            show_excluded: self.show_excluded,
            progress_interval: self.progress_interval,
            cancel_flag,
            progress_callback,
            processed: 0,
            included_count: 0,
            excluded_count: 0,
            total_size: 0,
        };

        let root_name = root_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.display().to_string());
        let mut root = FileNode::new_dir(root_name, root_path.to_path_buf());
        walk.walk_into(&mut root)?;

        tracing::info!(
            included = walk.included_count,
            excluded = walk.excluded_count,
            total_size = walk.total_size,
            "Scan walk completed"
        );

        Ok(ScanResult {
            root,
            included_count: walk.included_count,
            excluded_count: walk.excluded_count,
            total_size: walk.total_size,
        })
    }
}

/// Mutable state of one walk, threaded through the recursion.
struct Walk<'a, F> {
    rules: &'a RuleSet,
    show_excluded: bool,
    progress_interval: usize,
    cancel_flag: &'a AtomicBool,
    progress_callback: F,
    processed: usize,
    included_count: usize,
    excluded_count: usize,
    total_size: u64,
}

impl<F> Walk<'_, F>
where
    F: Fn(usize),
{
    fn walk_into(&mut self, dir_node: &mut FileNode) -> Result<(), CoreError> {
        // Permission errors on directory iteration mean zero entries for this
        // subtree; the scan continues elsewhere.
        let read_dir = match fs::read_dir(&dir_node.path) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!(path = %dir_node.path.display(), error = %e, "Skipping unreadable directory");
                return Ok(());
            }
        };

        let mut entries: Vec<(String, bool, std::path::PathBuf)> = read_dir
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let file_type = entry.file_type().ok()?;
                let name = entry.file_name().to_string_lossy().into_owned();
                Some((name, file_type.is_dir(), entry.path()))
            })
            .collect();

        // Directories before files, then by name, so scans and exports are
        // deterministic across platforms.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        for (name, is_dir, path) in entries {
            if self.cancel_flag.load(Ordering::Relaxed) {
                return Err(CoreError::Cancelled);
            }

            self.processed += 1;
            if self.processed % self.progress_interval == 0 {
                (self.progress_callback)(self.processed);
            }

            if is_dir {
                // A name-excluded directory is skipped wholesale: no node, no
                // recursion, no counting, regardless of show_excluded.
                if classify(&name, true, self.rules) == Verdict::Excluded {
                    continue;
                }
                let mut child = FileNode::new_dir(name, path);
                self.walk_into(&mut child)?;
                dir_node.children.push(child);
            } else {
                match classify(&name, false, self.rules) {
                    Verdict::Excluded => {
                        if self.show_excluded {
                            self.excluded_count += 1;
                            dir_node.children.push(FileNode::new_file(name, path, true, 0));
                        }
                        // Otherwise the file does not exist for this scan.
                    }
                    Verdict::Included => {
                        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                        self.included_count += 1;
                        self.total_size += size;
                        dir_node
                            .children
                            .push(FileNode::new_file(name, path, false, size));
                    }
                }
            }
        }

        Ok(())
    }
}
