//! Document file I/O: the natural export shape is a JSON array of
//! `{ "id", "type", "data" }` records in document order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::{Block, Document, DocumentError};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Read a document from a JSON file.
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let blocks: Vec<Block> = serde_json::from_str(&content)?;
    Ok(Document::from_blocks(blocks)?)
}

/// Write a document to a JSON file, blocks in document order.
pub fn write_document(path: &Path, doc: &Document) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let blocks: Vec<&Block> = doc.iter().collect();
    let content = serde_json::to_string_pretty(&blocks)?;
    fs::write(path, content)?;
    Ok(())
}
