//! Tracks which nodes of the current tree are selected for export.
//!
//! Selection lives entirely on the presentation side of the channel: it is
//! read and written from a single thread and needs no synchronization. The
//! one hard rule is that an excluded node can never become selected, no
//! matter what sequence of calls the presentation layer issues.

use std::collections::HashSet;
use std::path::PathBuf;

use super::FileNode;

/// Aggregates derived from the selection by traversal, never cached.
///
/// Only included, selected *file* nodes contribute; directory selection is
/// bookkeeping only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub selected_count: usize,
    pub selected_size: u64,
}

/// Path-keyed selection state for one scanned tree.
#[derive(Debug, Default)]
pub struct SelectionModel {
    selected: HashSet<PathBuf>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, node: &FileNode) -> bool {
        self.selected.contains(&node.path)
    }

    /// Flips the selection state of one node. A no-op on excluded nodes.
    pub fn toggle(&mut self, node: &FileNode) {
        if node.is_excluded {
            return;
        }
        if !self.selected.remove(&node.path) {
            self.selected.insert(node.path.clone());
        }
    }

    /// Marks every non-excluded node in the tree selected, files and
    /// directories alike.
    pub fn select_all(&mut self, root: &FileNode) {
        fn visit(node: &FileNode, selected: &mut HashSet<PathBuf>) {
            if !node.is_excluded {
                selected.insert(node.path.clone());
            }
            for child in &node.children {
                visit(child, selected);
            }
        }
        visit(root, &mut self.selected);
    }

    /// Clears every selection. Deselecting an unselectable node is harmless,
    /// so no exclusion check is needed here.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// The selected, included file nodes in depth-first pre-order.
    pub fn selected_files(&self, root: &FileNode) -> Vec<PathBuf> {
        let mut files = Vec::new();
        self.collect_files(root, &mut files);
        files
    }

    fn collect_files(&self, node: &FileNode, files: &mut Vec<PathBuf>) {
        if !node.is_dir && !node.is_excluded && self.is_selected(node) {
            files.push(node.path.clone());
        }
        for child in &node.children {
            self.collect_files(child, files);
        }
    }

    /// Recomputes the selected-file aggregates from the tree.
    pub fn stats(&self, root: &FileNode) -> SelectionStats {
        let mut stats = SelectionStats::default();
        self.accumulate(root, &mut stats);
        stats
    }

    fn accumulate(&self, node: &FileNode, stats: &mut SelectionStats) {
        if !node.is_dir && !node.is_excluded && self.is_selected(node) {
            stats.selected_count += 1;
            stats.selected_size += node.size;
        }
        for child in &node.children {
            self.accumulate(child, stats);
        }
    }
}
