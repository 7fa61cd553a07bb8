//! File-to-text extraction for the document corpus.
//!
//! Branches on the file extension: plain text, DOCX containers and the
//! two HWP generations. A file that cannot be extracted is skipped with
//! a warning; it never aborts a corpus load.

pub mod docx;
pub mod hwp;

use std::fs;
use std::path::{Path, PathBuf};

use docsearch_core::error::Error;
use docsearch_core::types::Document;
use tracing::{debug, info, warn};

/// Recognized corpus file extensions. Anything else is ignored when
/// walking a directory.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "docx", "hwp", "hwpx"];

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
}

/// Extract plain text from a single file.
pub fn extract_file(path: &Path) -> anyhow::Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" => Ok(String::from_utf8_lossy(&fs::read(path)?).into_owned()),
        "docx" => docx::extract_docx(path),
        "hwp" | "hwpx" => hwp::extract_hwp(path),
        _ => Err(Error::Extraction {
            path: path.to_path_buf(),
            reason: format!("unsupported extension '{ext}'"),
        }
        .into()),
    }
}

/// Load a set of files and/or recursively-walked directories into
/// documents. Files that fail extraction or yield blank text are
/// skipped with a log line; the batch always completes.
pub fn load_documents(paths: &[PathBuf]) -> Vec<Document> {
    let mut files: Vec<PathBuf> = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                if is_supported(entry.path()) {
                    files.push(entry.path().to_path_buf());
                }
            }
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            warn!(path = %path.display(), "path does not exist, skipping");
        }
    }

    let mut documents = Vec::new();
    for file in files {
        match extract_file(&file) {
            Ok(text) if !text.trim().is_empty() => {
                let source_id = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.display().to_string());
                info!(source = %source_id, chars = text.chars().count(), "loaded document");
                documents.push(Document {
                    source_id,
                    content: text,
                });
            }
            Ok(_) => {
                debug!(path = %file.display(), "extracted no text, skipping");
            }
            Err(e) => {
                warn!(path = %file.display(), error = %e, "extraction failed, skipping");
            }
        }
    }
    documents
}
