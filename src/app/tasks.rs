//! The scan coordinator: spawns the background walk, relays progress and
//! delivers exactly one terminal event per surviving scan generation.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;

use crate::core::{CoreError, TreeBuilder};

/// Initiates a directory scan for the given path.
///
/// Any in-flight scan is cancelled first and its generation invalidated, so
/// only the newest request's results are ever delivered.
pub fn start_scan<P: EventProxy>(path: PathBuf, proxy: P, state: Arc<Mutex<AppState>>) {
    let (generation, cancel_flag, rules, show_excluded, progress_interval) = {
        let mut state_guard = state.lock().unwrap();
        let (generation, cancel_flag) = state_guard.begin_scan_session(path.clone());
        (
            generation,
            cancel_flag,
            state_guard.config.rules.clone(),
            state_guard.config.show_excluded,
            state_guard.config.progress_interval,
        )
    };

    proxy.send_event(UserEvent::Status("Scanning in progress...".to_string()));

    let task_proxy = proxy.clone();
    let task_state = state.clone();
    let handle = tokio::spawn(async move {
        scan_directory_task(
            path,
            rules,
            show_excluded,
            progress_interval,
            generation,
            cancel_flag,
            task_proxy,
            task_state,
        )
        .await;
    });
    state.lock().unwrap().scan_task = Some(handle);
}

/// The asynchronous main task for scanning a directory.
///
/// The recursive walk itself runs on a blocking thread; everything it reports
/// crosses back over the event channel.
#[allow(clippy::too_many_arguments)]
async fn scan_directory_task<P: EventProxy>(
    path: PathBuf,
    rules: crate::core::RuleSet,
    show_excluded: bool,
    progress_interval: usize,
    generation: u64,
    cancel_flag: Arc<AtomicBool>,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    tracing::info!(path = %path.display(), generation, "Scan task started");

    let builder =
        TreeBuilder::new(rules, show_excluded).with_progress_interval(progress_interval);
    let progress_proxy = proxy.clone();
    let progress_state = state.clone();
    let walk_flag = cancel_flag.clone();

    let scan_result = tokio::task::spawn_blocking(move || {
        builder.build(&path, &walk_flag, move |processed| {
            // Checked and sent under the state lock, like the terminal
            // events: a superseding scan bumps the generation under the same
            // lock, so a stale progress event can never land after a newer
            // generation's first event.
            let state_guard = progress_state.lock().unwrap();
            if state_guard.is_current_generation(generation) {
                progress_proxy.send_event(UserEvent::ScanProgress(processed));
            }
        })
    })
    .await;

    let mut state_guard = state.lock().unwrap();
    if !state_guard.is_current_generation(generation) {
        tracing::warn!(generation, "Scan superseded, discarding results");
        return;
    }

    match scan_result {
        Ok(Ok(result)) => {
            tracing::info!(
                included = result.included_count,
                excluded = result.excluded_count,
                "Scan completed"
            );
            state_guard.scan_result = Some(result.clone());
            state_guard.is_scanning = false;
            state_guard.scan_task = None;
            proxy.send_event(UserEvent::ScanComplete(Box::new(result)));
            proxy.send_event(UserEvent::Status("Scan completed".to_string()));
        }
        Ok(Err(CoreError::Cancelled)) => {
            // Normally a newer generation has taken over by now; reaching
            // this arm means the flag was raised without a follow-up scan.
            state_guard.is_scanning = false;
            state_guard.scan_task = None;
            proxy.send_event(UserEvent::Status("Scan interrupted".to_string()));
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Scan failed");
            state_guard.is_scanning = false;
            state_guard.scan_task = None;
            proxy.send_event(UserEvent::Error(e.to_string()));
        }
        Err(join_error) => {
            tracing::error!(error = %join_error, "Scan task panicked or was aborted");
            state_guard.is_scanning = false;
            state_guard.scan_task = None;
            proxy.send_event(UserEvent::Error(format!(
                "Error during scanning: {join_error}"
            )));
        }
    }
}
