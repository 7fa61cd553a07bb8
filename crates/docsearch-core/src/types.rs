//! Domain types shared by the keyword and semantic retrieval engines.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// One ingested source file after text extraction.
///
/// `source_id` is the file name; it is carried into every chunk so the
/// chat surface can cite where a passage came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub source_id: String,
    pub content: String,
}

/// A bounded-length, possibly overlapping passage of a source document,
/// the unit of retrieval.
///
/// - `id`: globally unique, `"<source_id>:<chunk_index>"`
/// - `source_id`: inherited from the parent document
/// - `chunk_index`/`total_chunks`: position within the parent document
/// - `content`: a contiguous substring of the parent document's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub source_id: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub content: String,
}

/// Indicates which retriever produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SourceKind {
    Keyword,
    Semantic,
}

/// A ranked retrieval result. `score` is retriever-specific (BM25 for
/// keyword, similarity for semantic) but higher is always better, and
/// scores from the two retrievers are never compared with each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
    pub source: SourceKind,
}

/// What `ask` returns to the chat surface: the synthesized answer and
/// the passages it was built from, in merged rank order.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub passages: Vec<RetrievedChunk>,
}

/// Summary of one index build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IndexReport {
    pub document_count: usize,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the chat session. Append-only; cleared on restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
}
