//! docsearch-vector
//!
//! LanceDB-backed vector store over document chunks: wholesale index
//! builds and nearest-neighbor search by embedding similarity.

pub mod schema;
pub mod store;

pub use store::VectorStore;
