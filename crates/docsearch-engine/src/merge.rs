//! Rank-slot fusion of keyword and semantic result lists.
//!
//! Scores from the two retrievers live on incompatible scales (BM25 vs
//! cosine similarity), so the merge works on rank positions only: a fixed
//! quota of top keyword hits, then a quota of top semantic hits, then the
//! remainders interleaved until `k` entries are collected. Duplicates are
//! dropped by exact chunk-content equality, first occurrence wins.

use std::collections::HashSet;

use docsearch_core::types::RetrievedChunk;

#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Top keyword hits admitted before any semantic hit.
    pub primary_quota: usize,
    /// Top semantic hits admitted after the primary block.
    pub secondary_quota: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self { primary_quota: 3, secondary_quota: 3 }
    }
}

/// Merge two ranked lists into at most `k` chunks.
///
/// Both inputs must already be sorted best-first; the output preserves
/// the slot order described above and never re-sorts by score.
pub fn merge_ranked(
    keyword: &[RetrievedChunk],
    semantic: &[RetrievedChunk],
    k: usize,
    policy: &MergePolicy,
) -> Vec<RetrievedChunk> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<RetrievedChunk> = Vec::new();

    let mut admit = |hit: &RetrievedChunk, merged: &mut Vec<RetrievedChunk>| {
        if seen.insert(hit.chunk.content.clone()) {
            merged.push(hit.clone());
        }
    };

    for hit in keyword.iter().take(policy.primary_quota) {
        admit(hit, &mut merged);
    }
    for hit in semantic.iter().take(policy.secondary_quota) {
        admit(hit, &mut merged);
    }

    let mut keyword_rest = keyword.iter().skip(policy.primary_quota);
    let mut semantic_rest = semantic.iter().skip(policy.secondary_quota);
    loop {
        if merged.len() >= k {
            break;
        }
        let mut progressed = false;
        if let Some(hit) = keyword_rest.next() {
            admit(hit, &mut merged);
            progressed = true;
        }
        if merged.len() < k {
            if let Some(hit) = semantic_rest.next() {
                admit(hit, &mut merged);
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    merged.truncate(k);
    merged
}
