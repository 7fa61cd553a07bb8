//! docsearch-text
//!
//! Tantivy-based keyword indexing and ranked (BM25) retrieval over
//! document chunks. See `tantivy_utils` for the schema and the CJK
//! n-gram analyzer.

pub mod index;
pub mod tantivy_utils;

pub use index::KeywordIndex;
