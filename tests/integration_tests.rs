//! Integration tests for the scan/export engine.
//!
//! These tests drive the command surface the way a presentation layer would:
//! issue commands, then drain the event channel and assert on what arrives.

use code_exporter::app::{commands, events::UserEvent, state::AppState};
use code_exporter::core::ScanResult;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

mod helpers {
    use super::*;
    use code_exporter::utils::test_helpers::setup_test_logging;
    use std::fs;

    /// `TestHarness` sets up a complete, isolated environment for each test case.
    pub struct TestHarness {
        pub state: Arc<Mutex<AppState>>,
        pub proxy: mpsc::UnboundedSender<UserEvent>,
        pub event_rx: mpsc::UnboundedReceiver<UserEvent>,
        pub root_path: PathBuf,
        _temp_dir: TempDir,
    }

    impl TestHarness {
        pub fn new() -> Self {
            setup_test_logging();
            let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
            let root_path = temp_dir.path().to_path_buf();
            let (event_tx, event_rx) = mpsc::unbounded_channel();

            Self {
                state: Arc::new(Mutex::new(AppState::default())),
                proxy: event_tx,
                event_rx,
                root_path,
                _temp_dir: temp_dir,
            }
        }

        /// Creates a file inside the temporary test directory.
        pub fn create_file(&self, path: &str, content: &str) {
            let file_path = self.root_path.join(path);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            fs::write(file_path, content).expect("Failed to write file");
        }

        /// Sets up the canonical scenario: one included file, one file
        /// excluded by extension and one directory excluded by name.
        pub fn setup_mixed_project(&self) {
            self.create_file("a.py", "print('a')\n");
            self.create_file("b.png", "binary-ish");
            self.create_file("node_modules/x.js", "module.exports = {};");
        }

        pub fn request_scan(&self) {
            commands::request_scan(self.root_path.clone(), self.proxy.clone(), self.state.clone());
        }

        /// Drains events until the scan's terminal event arrives.
        pub async fn wait_for_scan_completion(&mut self) -> Box<ScanResult> {
            loop {
                match tokio::time::timeout(Duration::from_secs(10), self.event_rx.recv()).await {
                    Ok(Some(UserEvent::ScanComplete(result))) => return result,
                    Ok(Some(UserEvent::Error(message))) => {
                        panic!("Scan failed with error: {message}")
                    }
                    Ok(Some(_)) => { /* Ignore progress and status events */ }
                    _ => panic!("Scan did not complete within timeout or channel closed"),
                }
            }
        }

        /// Drains events until an error event arrives, returning its message.
        pub async fn wait_for_error(&mut self) -> String {
            loop {
                match tokio::time::timeout(Duration::from_secs(10), self.event_rx.recv()).await {
                    Ok(Some(UserEvent::Error(message))) => return message,
                    Ok(Some(UserEvent::ScanComplete(_))) => {
                        panic!("Expected an error but the scan completed")
                    }
                    Ok(Some(_)) => {}
                    _ => panic!("No error arrived within timeout or channel closed"),
                }
            }
        }

        /// Finds a node path in the current tree by file name.
        pub fn node_path(&self, name: &str) -> PathBuf {
            fn find(node: &code_exporter::core::FileNode, name: &str) -> Option<PathBuf> {
                if node.name == name {
                    return Some(node.path.clone());
                }
                node.children.iter().find_map(|c| find(c, name))
            }
            let state = self.state.lock().unwrap();
            let result = state.scan_result.as_ref().expect("no scan result");
            find(&result.root, name).unwrap_or_else(|| panic!("node {name} not in tree"))
        }
    }
}

use helpers::TestHarness;

#[tokio::test]
async fn scan_classifies_the_mixed_project() {
    let mut harness = TestHarness::new();
    harness.setup_mixed_project();

    harness.request_scan();
    let result = harness.wait_for_scan_completion().await;

    assert_eq!(result.included_count, 1);
    assert_eq!(result.excluded_count, 0);
    let names: Vec<&str> = result.root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a.py"]);
}

#[tokio::test]
async fn show_excluded_rescan_reveals_marked_files_but_not_excluded_dirs() {
    let mut harness = TestHarness::new();
    harness.setup_mixed_project();

    harness.request_scan();
    harness.wait_for_scan_completion().await;

    commands::set_show_excluded(true, harness.proxy.clone(), harness.state.clone());
    let result = harness.wait_for_scan_completion().await;

    assert_eq!(result.included_count, 1);
    assert_eq!(result.excluded_count, 1);
    let names: Vec<&str> = result.root.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a.py", "b.png"]);
    let b = &result.root.children[1];
    assert!(b.is_excluded);
    // Directory-level exclusion is unconditional.
    assert!(!names.contains(&"node_modules"));
}

#[tokio::test]
async fn scan_progress_events_arrive_and_increase() {
    let mut harness = TestHarness::new();
    for i in 0..25 {
        harness.create_file(&format!("file_{i:02}.py"), "x = 1\n");
    }

    harness.request_scan();

    let mut progress_counts = Vec::new();
    loop {
        match tokio::time::timeout(Duration::from_secs(10), harness.event_rx.recv()).await {
            Ok(Some(UserEvent::ScanProgress(count))) => progress_counts.push(count),
            Ok(Some(UserEvent::ScanComplete(_))) => break,
            Ok(Some(UserEvent::Error(message))) => panic!("Scan failed with error: {message}"),
            Ok(Some(_)) => {}
            _ => panic!("Scan did not complete within timeout or channel closed"),
        }
    }

    assert!(
        !progress_counts.is_empty(),
        "a 25-entry tree must emit progress before completing"
    );
    assert!(
        progress_counts.windows(2).all(|w| w[0] < w[1]),
        "processed counts must strictly increase: {progress_counts:?}"
    );
}

#[tokio::test]
async fn a_new_scan_supersedes_the_previous_one() {
    let mut harness = TestHarness::new();
    for i in 0..200 {
        harness.create_file(&format!("pkg/file_{i:03}.py"), "x = 1\n");
    }
    let second_dir = harness.root_path.join("pkg");

    harness.request_scan();
    commands::request_scan(second_dir.clone(), harness.proxy.clone(), harness.state.clone());

    // Only one generation's completion may be delivered from here on, and it
    // must be the newer one.
    let result = harness.wait_for_scan_completion().await;
    assert_eq!(result.root.path, second_dir);
    assert_eq!(result.included_count, 200);

    // No stale completion trails in after the newer generation's result.
    loop {
        match tokio::time::timeout(Duration::from_millis(300), harness.event_rx.recv()).await {
            Ok(Some(UserEvent::ScanComplete(stale))) => {
                panic!("Stale scan result delivered for {:?}", stale.root.path)
            }
            Ok(Some(_)) => {}
            _ => break,
        }
    }

    let state = harness.state.lock().unwrap();
    let stored = state.scan_result.as_ref().expect("scan result missing");
    assert_eq!(stored.root.path, second_dir);
}

#[tokio::test]
async fn selection_commands_respect_the_exclusion_invariant() {
    let mut harness = TestHarness::new();
    harness.setup_mixed_project();
    {
        let mut state = harness.state.lock().unwrap();
        state.config.show_excluded = true;
    }

    harness.request_scan();
    harness.wait_for_scan_completion().await;

    commands::select_all(harness.proxy.clone(), harness.state.clone());
    let excluded = harness.node_path("b.png");
    commands::toggle_node(&excluded, harness.proxy.clone(), harness.state.clone());

    {
        let state = harness.state.lock().unwrap();
        let result = state.scan_result.as_ref().unwrap();
        let stats = state.selection.stats(&result.root);
        // Only a.py counts; the toggle on the excluded b.png was a no-op.
        assert_eq!(stats.selected_count, 1);
    }

    commands::deselect_all(harness.proxy.clone(), harness.state.clone());
    let state = harness.state.lock().unwrap();
    let result = state.scan_result.as_ref().unwrap();
    let stats = state.selection.stats(&result.root);
    assert_eq!(stats.selected_count, 0);
    assert_eq!(stats.selected_size, 0);
}

#[tokio::test]
async fn contents_export_writes_selected_files_in_order() {
    let mut harness = TestHarness::new();
    harness.create_file("src/a.py", "alpha\n");
    harness.create_file("readme.md", "# readme\n");

    harness.request_scan();
    harness.wait_for_scan_completion().await;
    commands::select_all(harness.proxy.clone(), harness.state.clone());

    let dest = harness.root_path.join("export.txt");
    commands::request_export_contents(&dest, harness.proxy.clone(), harness.state.clone());

    let output = std::fs::read_to_string(&dest).expect("export file missing");
    let a_pos = output.find("FILE: src/a.py").unwrap();
    let readme_pos = output.find("FILE: readme.md").unwrap();
    assert!(a_pos < readme_pos, "directories-first pre-order expected");
    assert!(output.contains("alpha\n"));
    assert!(output.contains("# readme\n"));
}

#[tokio::test]
async fn structure_export_lists_every_node_with_markers() {
    let mut harness = TestHarness::new();
    harness.create_file("src/a.py", "alpha\n");
    harness.create_file("readme.md", "# readme\n");

    harness.request_scan();
    harness.wait_for_scan_completion().await;

    let a_path = harness.node_path("a.py");
    commands::toggle_node(&a_path, harness.proxy.clone(), harness.state.clone());

    let dest = harness.root_path.join("structure.txt");
    commands::request_export_structure(&dest, harness.proxy.clone(), harness.state.clone());

    let output = std::fs::read_to_string(&dest).expect("structure file missing");
    assert!(output.starts_with("PROJECT STRUCTURE\n"));
    assert!(output.contains("  src/\n"));
    assert!(output.contains("    a.py [x]\n"));
    assert!(output.contains("  readme.md [ ]\n"));
}

#[tokio::test]
async fn contents_export_with_empty_selection_is_rejected() {
    let mut harness = TestHarness::new();
    harness.create_file("a.py", "alpha\n");

    harness.request_scan();
    harness.wait_for_scan_completion().await;

    let dest = harness.root_path.join("export.txt");
    commands::request_export_contents(&dest, harness.proxy.clone(), harness.state.clone());

    let message = harness.wait_for_error().await;
    assert!(message.contains("No files selected"));
    assert!(!dest.exists(), "nothing may be written for an empty selection");
}

#[tokio::test]
async fn export_before_any_scan_reports_no_project() {
    let mut harness = TestHarness::new();

    let dest = harness.root_path.join("export.txt");
    commands::request_export_contents(&dest, harness.proxy.clone(), harness.state.clone());

    let message = harness.wait_for_error().await;
    assert!(message.contains("No project folder"));
}

#[tokio::test]
async fn scanning_a_missing_path_reports_an_error() {
    let mut harness = TestHarness::new();
    commands::request_scan(
        harness.root_path.join("does-not-exist"),
        harness.proxy.clone(),
        harness.state.clone(),
    );

    let message = harness.wait_for_error().await;
    assert!(message.contains("does not exist"));
}
