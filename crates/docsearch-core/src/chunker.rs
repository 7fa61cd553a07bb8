//! Splits extracted document text into overlapping passages.
//!
//! A sliding window of at most `chunk_size` chars advances over the
//! text; the window end is snapped to the latest separator found, in
//! preference order (paragraph break, line break, sentence end, space),
//! falling back to a hard cut. The next window starts `overlap` chars
//! before the previous cut, so chunk boundaries never lose context.
//! All arithmetic is over char boundaries; the corpus is Korean.

use crate::types::{Document, DocumentChunk};

/// Separators in preference order. The empty-string fallback of the
/// usual recursive splitter is the hard cut at `chunk_size`.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", ".", " "];

#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    /// Maximum chunk length in chars. Large enough that a section title
    /// and several of its articles land in the same chunk.
    pub chunk_size: usize,
    /// Chars of the previous chunk repeated at the start of the next,
    /// so a title is carried into the following chunk.
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            overlap: 300,
        }
    }
}

pub fn split_document(doc: &Document, config: &ChunkerConfig) -> Vec<DocumentChunk> {
    let pieces = split_text(&doc.content, config);
    let total_chunks = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| DocumentChunk {
            id: format!("{}:{}", doc.source_id, chunk_index),
            source_id: doc.source_id.clone(),
            chunk_index,
            total_chunks,
            content,
        })
        .collect()
}

/// Split `text` into overlapping windows. Every returned string is a
/// contiguous substring of `text`; whitespace-only windows are dropped.
pub fn split_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let chunk_size = config.chunk_size.max(1);
    // overlap >= chunk_size would stall the window
    let overlap = config.overlap.min(chunk_size / 2);

    // bounds[i] is the byte offset of char i; bounds[n_chars] == text.len()
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let n_chars = bounds.len() - 1;

    if n_chars <= chunk_size {
        if text.trim().is_empty() {
            return Vec::new();
        }
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = (start + chunk_size).min(n_chars);
        let mut cut = end;
        if end < n_chars {
            for sep in SEPARATORS {
                let window = &text[bounds[start]..bounds[end]];
                if let Some(pos) = window.rfind(sep) {
                    let cut_byte = bounds[start] + pos + sep.len();
                    let cut_char = bounds.partition_point(|&b| b < cut_byte);
                    // the cut must leave room for the next window to advance
                    if cut_char > start + overlap {
                        cut = cut_char;
                        break;
                    }
                }
            }
        }

        let piece = &text[bounds[start]..bounds[cut]];
        if !piece.trim().is_empty() {
            chunks.push(piece.to_string());
        }
        if cut >= n_chars {
            break;
        }
        start = cut - overlap;
    }
    chunks
}
