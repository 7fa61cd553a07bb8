use docsearch_core::chunker::{split_document, split_text, ChunkerConfig};
use docsearch_core::types::Document;

fn cfg(chunk_size: usize, overlap: usize) -> ChunkerConfig {
    ChunkerConfig {
        chunk_size,
        overlap,
    }
}

#[test]
fn short_text_is_a_single_chunk() {
    let chunks = split_text("짧은 텍스트", &ChunkerConfig::default());
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0], "짧은 텍스트");
}

#[test]
fn blank_text_yields_no_chunks() {
    assert!(split_text("   \n\n  ", &ChunkerConfig::default()).is_empty());
    assert!(split_text("", &ChunkerConfig::default()).is_empty());
}

#[test]
fn every_chunk_is_a_substring_within_the_size_bound() {
    let text = "제1조 (목적) 이 규정은 연구원의 복무에 관한 사항을 정한다.\n\n"
        .repeat(40);
    let config = cfg(120, 20);
    for chunk in split_text(&text, &config) {
        assert!(text.contains(&chunk), "chunk must be a contiguous substring");
        assert!(chunk.chars().count() <= 120);
    }
}

#[test]
fn consecutive_chunks_overlap() {
    // no separators at all, so every cut is a hard cut
    let text: String = "가나다라마바사아자차".repeat(50);
    let config = cfg(100, 30);
    let chunks = split_text(&text, &config);
    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let tail: String = pair[0].chars().skip(pair[0].chars().count() - 30).collect();
        assert!(
            pair[1].starts_with(&tail),
            "next chunk must repeat the previous chunk's tail"
        );
    }
}

#[test]
fn cuts_prefer_paragraph_breaks() {
    let para = "문단 내용입니다. ".repeat(4);
    let text = format!("{para}\n\n{para}\n\n{para}");
    let config = cfg(para.chars().count() + 10, 5);
    let chunks = split_text(&text, &config);
    // the first cut lands on the paragraph break, not mid-sentence
    assert!(chunks[0].ends_with("\n\n"), "first chunk: {:?}", chunks[0]);
}

#[test]
fn korean_text_never_splits_inside_a_char() {
    // would panic on a byte-oriented slice; chars are 3 bytes each
    let text = "육아휴직과 연차휴가에 관한 규정".repeat(100);
    for chunk in split_text(&text, &cfg(37, 11)) {
        assert!(!chunk.is_empty());
    }
}

#[test]
fn document_chunks_carry_source_and_position() {
    let doc = Document {
        source_id: "취업규칙.txt".to_string(),
        content: "첫 문단.\n\n둘째 문단.\n\n셋째 문단.".to_string(),
    };
    let chunks = split_document(&doc, &cfg(12, 3));
    assert!(!chunks.is_empty());
    let total = chunks.len();
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.source_id, "취업규칙.txt");
        assert_eq!(c.chunk_index, i);
        assert_eq!(c.total_chunks, total);
        assert_eq!(c.id, format!("취업규칙.txt:{i}"));
    }
}

#[test]
fn expand_path_handles_env_vars() {
    std::env::set_var("DOCSEARCH_TEST_BASE", "/tmp/docsearch");
    let p = docsearch_core::config::expand_path("${DOCSEARCH_TEST_BASE}/doc");
    assert_eq!(p, std::path::PathBuf::from("/tmp/docsearch/doc"));
}
