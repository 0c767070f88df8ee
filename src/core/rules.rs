//! The classification rule set and the classifier itself.
//!
//! Classification is a pure function of an entry's name and kind; it never
//! looks at file content or size. The four rule sets are fixed for the
//! lifetime of one scan — changing them requires a new scan.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// The verdict of the classifier for one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Included,
    Excluded,
}

/// The four exclusion/inclusion sets governing classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuleSet {
    /// Directory names that are skipped wholesale, subtree and all.
    pub excluded_dir_names: HashSet<String>,
    /// Exact file names that are excluded.
    pub excluded_file_names: HashSet<String>,
    /// File extensions (with leading dot, stored lowercased) that are
    /// excluded; matched case-insensitively.
    pub excluded_extensions: HashSet<String>,
    /// File extensions (with leading dot) a file must carry to be included;
    /// matched case-sensitively.
    pub included_extensions: HashSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        let dirs = [
            "node_modules",
            ".git",
            ".next",
            ".venv",
            "venv",
            "__pycache__",
            ".idea",
            ".vscode",
        ];
        let files = ["package-lock.json", "yarn.lock", ".DS_Store"];
        let excluded_exts = [
            // Images
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico", ".tiff", ".psd",
            // Audio
            ".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a", ".wma", ".opus",
            // Video
            ".mp4", ".mov", ".avi", ".mkv", ".flv", ".webm", ".wmv", ".m4v", ".3gp",
            // Documents, archives, binaries
            ".pdf", ".zip", ".tar", ".gz", ".7z", ".rar", ".exe", ".dll", ".so", ".dylib",
        ];
        let included_exts = [
            ".py", ".js", ".ts", ".tsx", ".jsx", ".html", ".css", ".json", ".env", ".md",
            ".txt", ".yml", ".yaml", ".xml", ".csv", ".ini", ".cfg", ".conf",
        ];

        Self {
            excluded_dir_names: dirs.iter().map(|s| s.to_string()).collect(),
            excluded_file_names: files.iter().map(|s| s.to_string()).collect(),
            excluded_extensions: excluded_exts.iter().map(|s| s.to_string()).collect(),
            included_extensions: included_exts.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Returns the final suffix of a file name including the leading dot, or an
/// empty string when there is none. Dotfiles like `.DS_Store` have no suffix.
pub fn file_suffix(name: &str) -> String {
    match Path::new(name).extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => String::new(),
    }
}

/// Classifies one directory entry against the rule set.
///
/// The predicates form a disjunction, so evaluation order does not affect the
/// outcome. Extension rules apply only to files; a directory can only be
/// excluded by its name.
pub fn classify(name: &str, is_dir: bool, rules: &RuleSet) -> Verdict {
    if is_dir {
        if rules.excluded_dir_names.contains(name) {
            return Verdict::Excluded;
        }
        return Verdict::Included;
    }

    if rules.excluded_file_names.contains(name) {
        return Verdict::Excluded;
    }

    let suffix = file_suffix(name);
    if rules.excluded_extensions.contains(&suffix.to_lowercase()) {
        return Verdict::Excluded;
    }
    if !rules.included_extensions.contains(&suffix) {
        return Verdict::Excluded;
    }

    Verdict::Included
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_excluded_only_by_name() {
        let rules = RuleSet::default();
        assert_eq!(classify("node_modules", true, &rules), Verdict::Excluded);
        assert_eq!(classify("src", true, &rules), Verdict::Included);
        // Extension rules never apply to directories.
        assert_eq!(classify("assets.png", true, &rules), Verdict::Included);
    }

    #[test]
    fn file_excluded_by_exact_name() {
        let rules = RuleSet::default();
        assert_eq!(classify("yarn.lock", false, &rules), Verdict::Excluded);
        assert_eq!(classify(".DS_Store", false, &rules), Verdict::Excluded);
    }

    #[test]
    fn file_excluded_by_extension_case_insensitive() {
        let rules = RuleSet::default();
        assert_eq!(classify("logo.PNG", false, &rules), Verdict::Excluded);
        assert_eq!(classify("movie.Mp4", false, &rules), Verdict::Excluded);
    }

    #[test]
    fn file_must_carry_an_included_extension() {
        let rules = RuleSet::default();
        assert_eq!(classify("main.py", false, &rules), Verdict::Included);
        assert_eq!(classify("notes.md", false, &rules), Verdict::Included);
        // Unknown extension and none at all both fall through to excluded.
        assert_eq!(classify("binary.blob", false, &rules), Verdict::Excluded);
        assert_eq!(classify("Makefile", false, &rules), Verdict::Excluded);
    }

    #[test]
    fn included_extension_match_is_case_sensitive() {
        let rules = RuleSet::default();
        assert_eq!(classify("script.py", false, &rules), Verdict::Included);
        assert_eq!(classify("script.PY", false, &rules), Verdict::Excluded);
    }

    #[test]
    fn suffix_includes_leading_dot() {
        assert_eq!(file_suffix("a.py"), ".py");
        assert_eq!(file_suffix("archive.tar.gz"), ".gz");
        assert_eq!(file_suffix(".DS_Store"), "");
        assert_eq!(file_suffix("README"), "");
    }
}
