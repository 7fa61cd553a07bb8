use docsearch_core::types::{DocumentChunk, RetrievedChunk, SourceKind};
use docsearch_engine::{merge_ranked, MergePolicy};

fn hit(content: &str, score: f32, source: SourceKind) -> RetrievedChunk {
    RetrievedChunk {
        chunk: DocumentChunk {
            id: format!("doc:{content}"),
            source_id: "doc".into(),
            chunk_index: 0,
            total_chunks: 1,
            content: content.into(),
        },
        score,
        source,
    }
}

fn keyword_hits(contents: &[&str]) -> Vec<RetrievedChunk> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| hit(c, 10.0 - i as f32, SourceKind::Keyword))
        .collect()
}

fn semantic_hits(contents: &[&str]) -> Vec<RetrievedChunk> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| hit(c, 0.9 - 0.1 * i as f32, SourceKind::Semantic))
        .collect()
}

fn contents(merged: &[RetrievedChunk]) -> Vec<&str> {
    merged.iter().map(|m| m.chunk.content.as_str()).collect()
}

#[test]
fn overlapping_lists_dedupe_and_truncate() {
    let keyword = keyword_hits(&["A", "B", "C", "D"]);
    let semantic = semantic_hits(&["B", "E", "F", "G"]);
    let merged = merge_ranked(&keyword, &semantic, 4, &MergePolicy::default());
    assert_eq!(contents(&merged), vec!["A", "B", "C", "E"]);
}

#[test]
fn empty_keyword_list_yields_semantic_prefix() {
    let semantic = semantic_hits(&["S1", "S2", "S3", "S4", "S5", "S6"]);
    let merged = merge_ranked(&[], &semantic, 5, &MergePolicy::default());
    assert_eq!(contents(&merged), vec!["S1", "S2", "S3", "S4", "S5"]);
}

#[test]
fn disjoint_lists_interleave_after_quotas() {
    let keyword = keyword_hits(&["K1", "K2", "K3", "K4", "K5"]);
    let semantic = semantic_hits(&["S1", "S2", "S3", "S4", "S5"]);
    let merged = merge_ranked(&keyword, &semantic, 10, &MergePolicy::default());
    assert_eq!(
        contents(&merged),
        vec!["K1", "K2", "K3", "S1", "S2", "S3", "K4", "S4", "K5", "S5"]
    );
}

#[test]
fn first_occurrence_keeps_its_source_tag() {
    let keyword = keyword_hits(&["A"]);
    let semantic = semantic_hits(&["A", "B"]);
    let merged = merge_ranked(&keyword, &semantic, 5, &MergePolicy::default());
    assert_eq!(contents(&merged), vec!["A", "B"]);
    assert_eq!(merged[0].source, SourceKind::Keyword);
    assert_eq!(merged[1].source, SourceKind::Semantic);
}

#[test]
fn k_zero_returns_nothing() {
    let keyword = keyword_hits(&["A"]);
    let semantic = semantic_hits(&["B"]);
    assert!(merge_ranked(&keyword, &semantic, 0, &MergePolicy::default()).is_empty());
}

#[test]
fn k_below_quota_cuts_inside_primary_block() {
    let keyword = keyword_hits(&["A", "B", "C"]);
    let semantic = semantic_hits(&["D", "E"]);
    let merged = merge_ranked(&keyword, &semantic, 2, &MergePolicy::default());
    assert_eq!(contents(&merged), vec!["A", "B"]);
}

#[test]
fn custom_quotas_shift_the_slot_boundary() {
    let keyword = keyword_hits(&["K1", "K2", "K3"]);
    let semantic = semantic_hits(&["S1", "S2", "S3"]);
    let policy = MergePolicy { primary_quota: 1, secondary_quota: 1 };
    let merged = merge_ranked(&keyword, &semantic, 6, &policy);
    assert_eq!(
        contents(&merged),
        vec!["K1", "S1", "K2", "S2", "K3", "S3"]
    );
}

#[test]
fn duplicates_inside_one_list_collapse() {
    let keyword = keyword_hits(&["A", "A", "B"]);
    let merged = merge_ranked(&keyword, &[], 5, &MergePolicy::default());
    assert_eq!(contents(&merged), vec!["A", "B"]);
}
