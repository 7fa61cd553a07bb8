//! Hybrid retrieval engine: keyword and semantic search fused by a
//! rank-slot merge, with answer synthesis on top.

pub mod engine;
pub mod merge;
pub mod prompt;

pub use engine::{EngineSettings, IndexHandle, SearchEngine};
pub use merge::{merge_ranked, MergePolicy};
pub use prompt::{build_prompt, NOT_INDEXED_MESSAGE};
