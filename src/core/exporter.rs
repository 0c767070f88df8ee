//! Renders the two export artifacts: a concatenation of the selected files'
//! contents and a structure-only listing of the scanned tree.

use std::fs;
use std::path::Path;

use super::selection::SelectionModel;
use super::{CoreError, FileNode};

const DELIMITER_WIDTH: usize = 50;

fn delimiter() -> String {
    "=".repeat(DELIMITER_WIDTH)
}

/// A utility struct for rendering export artifacts.
///
/// This struct is stateless and provides methods as associated functions.
/// Both renderers are pure functions of the tree and the selection; the
/// `export_*` wrappers write the result to a caller-supplied destination and
/// know nothing about how that destination was chosen.
pub struct Exporter;

impl Exporter {
    /// Renders every selected included file, in tree pre-order, as a
    /// delimited block of `FILE:` header plus raw content.
    ///
    /// An unreadable file contributes an inline error marker instead of its
    /// content; one bad file never aborts the whole export.
    pub fn render_contents(
        root_path: &Path,
        tree: &FileNode,
        selection: &SelectionModel,
    ) -> String {
        let mut output = String::new();
        for file_path in selection.selected_files(tree) {
            let relative = file_path
                .strip_prefix(root_path)
                .unwrap_or(&file_path)
                .display()
                .to_string();

            output.push_str("\n\n");
            output.push_str(&delimiter());
            output.push('\n');
            output.push_str(&format!("FILE: {relative}\n"));
            output.push_str(&delimiter());
            output.push_str("\n\n");

            match fs::read_to_string(&file_path) {
                Ok(content) => output.push_str(&content),
                Err(e) => {
                    tracing::warn!(path = %file_path.display(), error = %e, "Unreadable file in export");
                    output.push_str(&format!("[ERROR READING FILE: {e}]\n"));
                }
            }
        }
        output
    }

    /// Renders the whole tree as an indented listing: directories with a
    /// trailing `/` and files with a selected/unselected marker.
    pub fn render_structure(tree: &FileNode, selection: &SelectionModel) -> String {
        let mut output = format!("PROJECT STRUCTURE\n{}\n\n", delimiter());
        Self::render_node(tree, selection, 0, &mut output);
        output
    }

    fn render_node(node: &FileNode, selection: &SelectionModel, depth: usize, output: &mut String) {
        let indent = "  ".repeat(depth);
        if node.is_dir {
            output.push_str(&format!("{indent}{}/\n", node.name));
            for child in &node.children {
                Self::render_node(child, selection, depth + 1, output);
            }
        } else {
            let marker = if selection.is_selected(node) { "[x]" } else { "[ ]" };
            output.push_str(&format!("{indent}{} {marker}\n", node.name));
        }
    }

    /// Writes the contents artifact to `destination`.
    ///
    /// Rejected with [`CoreError::NoSelection`] before any write when nothing
    /// is selected.
    pub fn export_contents(
        root_path: &Path,
        tree: &FileNode,
        selection: &SelectionModel,
        destination: &Path,
    ) -> Result<(), CoreError> {
        if selection.selected_files(tree).is_empty() {
            return Err(CoreError::NoSelection);
        }
        let output = Self::render_contents(root_path, tree, selection);
        fs::write(destination, output)
            .map_err(|e| CoreError::Io(e, destination.to_path_buf()))?;
        tracing::info!(destination = %destination.display(), "Wrote contents export");
        Ok(())
    }

    /// Writes the structure artifact to `destination`.
    pub fn export_structure(
        tree: &FileNode,
        selection: &SelectionModel,
        destination: &Path,
    ) -> Result<(), CoreError> {
        let output = Self::render_structure(tree, selection);
        fs::write(destination, output)
            .map_err(|e| CoreError::Io(e, destination.to_path_buf()))?;
        tracing::info!(destination = %destination.display(), "Wrote structure export");
        Ok(())
    }
}
