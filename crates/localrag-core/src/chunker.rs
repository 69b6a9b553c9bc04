use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// Loads plain-text documents from a directory and cuts them into
/// overlapping fixed-size character windows.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Self { Self { config } }

    /// Chunk every eligible file directly inside `data_dir`, in file-name order.
    ///
    /// Fails with [`Error::NotFound`] when the directory holds no eligible
    /// file. Files that normalize to empty text contribute no chunks.
    pub fn load(&self, data_dir: &Path) -> Result<Vec<Chunk>> {
        let files = self.list_files(data_dir)?;
        if files.is_empty() {
            return Err(Error::NotFound(format!(
                "no .{} files found under {}",
                self.config.extension,
                data_dir.display()
            )));
        }
        let mut all_chunks = Vec::new();
        for file_path in &files {
            let content = read_file_content(file_path)?;
            let doc_id = file_name(file_path);
            let windows = self.split_text(&content);
            debug!(doc = %doc_id, chunks = windows.len(), "chunked document");
            all_chunks.extend(windows.into_iter().enumerate().map(|(i, text)| Chunk::new(doc_id.clone(), i, text)));
        }
        info!(files = files.len(), chunks = all_chunks.len(), dir = %data_dir.display(), "corpus loaded");
        Ok(all_chunks)
    }

    /// Normalize whitespace and slide a `chunk_size` window with stride
    /// `max(1, chunk_size - chunk_overlap)` until the start passes the end.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Vec::new();
        }
        let chars: Vec<char> = normalized.chars().collect();
        let size = self.config.chunk_size.max(1);
        (0..chars.len())
            .step_by(self.config.stride())
            .map(|start| chars[start..(start + size).min(chars.len())].iter().collect())
            .collect()
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::io(root, e.into()))?;
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(self.config.extension.as_str()) {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn read_file_content(file_path: &Path) -> Result<String> {
    let bytes = fs::read(file_path).map_err(|e| Error::io(file_path, e))?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok(content),
        Err(e) => Ok(decode_dropping_invalid(e.as_bytes())),
    }
}

/// Decode UTF-8, skipping invalid byte sequences. Encoded U+FFFD characters
/// are valid input and survive.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn file_name(file_path: &Path) -> String {
    file_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}
