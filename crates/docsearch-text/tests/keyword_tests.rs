use docsearch_core::types::DocumentChunk;
use docsearch_text::KeywordIndex;
use tempfile::TempDir;

fn chunk(source: &str, index: usize, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: format!("{source}:{index}"),
        source_id: source.to_string(),
        chunk_index: index,
        total_chunks: 0,
        content: content.to_string(),
    }
}

fn regulation_chunks() -> Vec<DocumentChunk> {
    vec![
        chunk(
            "복무규정.hwp",
            0,
            "제15조 (정의) 이 규정에서 사용하는 용어의 뜻은 다음과 같다.",
        ),
        chunk("복무규정.hwp", 1, "제16조 (근무시간) 근무시간은 주 40시간으로 한다."),
        chunk("휴가규정.docx", 0, "연차휴가는 1년간 80퍼센트 이상 출근한 직원에게 준다."),
        chunk("여비규정.txt", 0, "국내 출장 여비는 별표 기준에 따라 지급한다."),
    ]
}

#[test]
fn verbatim_substring_query_returns_its_chunk_first() {
    let tmp = TempDir::new().unwrap();
    let index = KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("build");

    let hits = index.search("근무시간은 주 40시간", 4).expect("search");
    assert!(!hits.is_empty());
    assert_eq!(hits[0].chunk.id, "복무규정.hwp:1");
}

#[test]
fn agglutinated_korean_query_matches_article_header() {
    let tmp = TempDir::new().unwrap();
    let index = KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("build");

    // "15조에" never appears verbatim; shared grams with "제15조" must match
    let hits = index.search("15조에 대해 알려줘", 4).expect("search");
    assert!(!hits.is_empty());
    assert!(hits[0].chunk.content.contains("제15조"));
}

#[test]
fn scores_are_descending() {
    let tmp = TempDir::new().unwrap();
    let index = KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("build");

    let hits = index.search("규정에서 사용하는 용어", 4).expect("search");
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn empty_query_returns_nothing() {
    let tmp = TempDir::new().unwrap();
    let index = KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("build");
    assert!(index.search("", 5).expect("search").is_empty());
    assert!(index.search("용어", 0).expect("search").is_empty());
}

#[test]
fn open_reads_a_persisted_index() {
    let tmp = TempDir::new().unwrap();
    {
        KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("build");
    }
    let reopened = KeywordIndex::open(tmp.path()).expect("open");
    let hits = reopened.search("연차휴가", 2).expect("search");
    assert_eq!(hits[0].chunk.source_id, "휴가규정.docx");
}

#[test]
fn open_fails_on_an_empty_directory() {
    let tmp = TempDir::new().unwrap();
    assert!(KeywordIndex::open(tmp.path()).is_err());
}

#[test]
fn rebuild_replaces_previous_contents() {
    let tmp = TempDir::new().unwrap();
    KeywordIndex::build(tmp.path(), &regulation_chunks()).expect("first build");
    let replacement = vec![chunk("신규.txt", 0, "완전히 새로운 내용")];
    let index = KeywordIndex::build(tmp.path(), &replacement).expect("rebuild");

    assert!(index.search("연차휴가", 5).expect("search").is_empty());
    let hits = index.search("새로운 내용", 5).expect("search");
    assert_eq!(hits[0].chunk.id, "신규.txt:0");
}
