//! Defines the central, mutable state of the application.

use crate::config::AppConfig;
use crate::core::{ScanResult, SelectionModel};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` to allow for safe, shared
/// access from the presentation loop and the async scan tasks. At most one
/// scan session is active at a time; the generation counter identifies the
/// current one so superseded workers can recognize themselves as stale.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// The root of the currently loaded project, if any.
    pub project_root: Option<PathBuf>,
    /// The result tree of the last completed scan. Replaced wholesale by the
    /// next scan; never patched incrementally.
    pub scan_result: Option<ScanResult>,
    /// Selection state over the current tree. Presentation-thread only.
    pub selection: SelectionModel,
    /// `true` if a directory scan is currently in progress.
    pub is_scanning: bool,
    /// The generation of the most recently started scan. Only read and
    /// written under the state lock; workers compare their own generation
    /// against this before delivering anything.
    pub scan_generation: u64,
    /// A handle to the currently running scan task, allowing it to be aborted.
    pub scan_task: Option<JoinHandle<()>>,
    /// A flag used to signal cancellation to the scan task.
    pub scan_cancellation_flag: Arc<AtomicBool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            project_root: None,
            scan_result: None,
            selection: SelectionModel::new(),
            is_scanning: false,
            scan_generation: 0,
            scan_task: None,
            scan_cancellation_flag: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl AppState {
    /// Cancels the current scan task, if any, and resets the scanning state.
    ///
    /// The worker keeps running until it next polls the flag, but its output
    /// is already doomed: the caller bumps the generation counter right
    /// after, so anything the old worker produces is dropped as stale.
    pub fn cancel_current_scan(&mut self) {
        if let Some(handle) = self.scan_task.take() {
            tracing::info!("Cancelling in-flight scan");
            handle.abort();
            self.scan_cancellation_flag.store(true, Ordering::SeqCst);
        }
        self.is_scanning = false;
    }

    /// Starts a new scan session: cancels any previous one, bumps the
    /// generation and installs a fresh cancellation flag. Returns the new
    /// generation and flag for the worker to carry.
    pub fn begin_scan_session(&mut self, root: PathBuf) -> (u64, Arc<AtomicBool>) {
        self.cancel_current_scan();
        self.scan_generation += 1;
        let generation = self.scan_generation;

        self.project_root = Some(root);
        self.scan_result = None;
        self.selection.deselect_all();
        self.is_scanning = true;

        let flag = Arc::new(AtomicBool::new(false));
        self.scan_cancellation_flag = flag.clone();
        (generation, flag)
    }

    /// `true` when `generation` still identifies the active scan session.
    pub fn is_current_generation(&self, generation: u64) -> bool {
        self.scan_generation == generation
    }
}
