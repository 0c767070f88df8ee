//! Human-readable formatting helpers for the status surface.

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;
const GB: u64 = 1024 * 1024 * 1024;

/// Formats a byte count the way the status bar shows it: plain bytes below
/// one KB, then two-decimal KB/MB/GB.
pub fn format_size(size_bytes: u64) -> String {
    if size_bytes < KB {
        format!("{size_bytes} bytes")
    } else if size_bytes < MB {
        format!("{:.2} KB", size_bytes as f64 / KB as f64)
    } else if size_bytes < GB {
        format!("{:.2} MB", size_bytes as f64 / MB as f64)
    } else {
        format!("{:.2} GB", size_bytes as f64 / GB as f64)
    }
}
