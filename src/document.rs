// src/document.rs
// =============================================================================
// Loads the markdown document to check.
//
// The checker only ever sees bytes; this is the one place that touches the
// filesystem.
// =============================================================================

use std::path::Path;

use crate::error::LoadError;

// Reads a markdown file from disk
//
// Refuses anything whose name doesn't end in ".md", even if it exists.
pub fn read_markdown(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
        return Err(LoadError::NotMarkdown(path.to_path_buf()));
    }

    Ok(bytes)
}
