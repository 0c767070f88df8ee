//! The command surface the presentation layer calls into.
//!
//! Each command locks the shared state, performs its work, and reports back
//! through the event channel. Commands never block on I/O except the export
//! writes, which are user-initiated one-shot actions.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::tasks;

use crate::core::{CoreError, Exporter, FileNode};
use crate::utils::format_size;

/// Scans the given project root, superseding any scan already in flight.
pub fn request_scan<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    tasks::start_scan(path, proxy, state);
}

/// Flips the show-excluded toggle. When a project is loaded this triggers a
/// full rescan; the tree is never patched in place.
pub fn set_show_excluded<P: EventProxy>(show: bool, proxy: P, state: Arc<Mutex<AppState>>) {
    let root = {
        let mut state_guard = state.lock().unwrap();
        if state_guard.config.show_excluded == show {
            return;
        }
        state_guard.config.show_excluded = show;
        state_guard.project_root.clone()
    };

    if let Some(root) = root {
        tasks::start_scan(root, proxy, state);
    }
}

/// Toggles the selection state of a single node, identified by path.
/// Toggling an excluded node is a no-op, whatever the presentation layer
/// thinks it is doing.
pub fn toggle_node<P: EventProxy>(path: &Path, proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state.lock().unwrap();
    let Some(result) = state_guard.scan_result.take() else {
        tracing::warn!("toggle_node called without a scanned tree. Ignoring.");
        return;
    };
    if let Some(node) = find_node(&result.root, path) {
        state_guard.selection.toggle(node);
    } else {
        tracing::warn!(path = %path.display(), "toggle_node on unknown path. Ignoring.");
    }
    state_guard.scan_result = Some(result);
    notify_selection(&state_guard, &proxy);
}

/// Selects every non-excluded node of the current tree.
pub fn select_all<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state.lock().unwrap();
    let Some(result) = state_guard.scan_result.take() else {
        tracing::warn!("select_all called without a scanned tree. Ignoring.");
        return;
    };
    state_guard.selection.select_all(&result.root);
    state_guard.scan_result = Some(result);
    notify_selection(&state_guard, &proxy);
}

/// Clears the selection.
pub fn deselect_all<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let mut state_guard = state.lock().unwrap();
    state_guard.selection.deselect_all();
    notify_selection(&state_guard, &proxy);
}

/// Writes the concatenated contents of all selected files to `destination`.
pub fn request_export_contents<P: EventProxy>(
    destination: &Path,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let state_guard = state.lock().unwrap();
    let (Some(root_path), Some(result)) =
        (state_guard.project_root.as_ref(), state_guard.scan_result.as_ref())
    else {
        proxy.send_event(UserEvent::Error(CoreError::NoProjectSelected.to_string()));
        return;
    };

    match Exporter::export_contents(root_path, &result.root, &state_guard.selection, destination) {
        Ok(()) => {
            proxy.send_event(UserEvent::ExportComplete(destination.to_path_buf()));
            proxy.send_event(UserEvent::Status("Export completed".to_string()));
        }
        Err(e) => proxy.send_event(UserEvent::Error(e.to_string())),
    }
}

/// Writes the structure listing of the current tree to `destination`.
pub fn request_export_structure<P: EventProxy>(
    destination: &Path,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let state_guard = state.lock().unwrap();
    let Some(result) = state_guard.scan_result.as_ref() else {
        proxy.send_event(UserEvent::Error(CoreError::NoProjectSelected.to_string()));
        return;
    };

    match Exporter::export_structure(&result.root, &state_guard.selection, destination) {
        Ok(()) => {
            proxy.send_event(UserEvent::ExportComplete(destination.to_path_buf()));
            proxy.send_event(UserEvent::Status("Structure exported".to_string()));
        }
        Err(e) => proxy.send_event(UserEvent::Error(e.to_string())),
    }
}

/// Reports the current selection aggregates through a status event.
fn notify_selection<P: EventProxy>(state: &AppState, proxy: &P) {
    let Some(result) = state.scan_result.as_ref() else {
        proxy.send_event(UserEvent::Status("Selected 0 files (0 bytes)".to_string()));
        return;
    };
    let stats = state.selection.stats(&result.root);
    proxy.send_event(UserEvent::Status(format!(
        "Selected {} files ({})",
        stats.selected_count,
        format_size(stats.selected_size)
    )));
}

/// Depth-first lookup of a node by its absolute path.
fn find_node<'a>(node: &'a FileNode, path: &Path) -> Option<&'a FileNode> {
    if node.path == path {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_node(child, path))
}
