use docsearch_core::types::DocumentChunk;
use docsearch_vector::VectorStore;
use tempfile::TempDir;

fn chunk(source: &str, index: usize, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: format!("{source}:{index}"),
        source_id: source.to_string(),
        chunk_index: index,
        total_chunks: 3,
        content: content.to_string(),
    }
}

fn fixture() -> (Vec<DocumentChunk>, Vec<Vec<f32>>) {
    let chunks = vec![
        chunk("규정.txt", 0, "제15조 (정의) 용어의 뜻"),
        chunk("규정.txt", 1, "제16조 (근무시간) 주 40시간"),
        chunk("규정.txt", 2, "연차휴가는 15일"),
    ];
    // orthonormal embeddings make nearest-neighbor checks exact
    let embeddings = vec![
        vec![1.0, 0.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0],
    ];
    (chunks, embeddings)
}

#[tokio::test]
async fn index_then_search_returns_nearest_chunk() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let store = VectorStore::create(tmp.path()).await?;
    let (chunks, embeddings) = fixture();
    store.index_chunks(&chunks, &embeddings).await?;

    let hits = store.search(&[0.0, 1.0, 0.0, 0.0], 2).await?;
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].chunk.id, "규정.txt:1");
    assert!(hits[0].score >= hits[1].score);
    Ok(())
}

#[tokio::test]
async fn open_fails_without_a_chunk_table() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    assert!(VectorStore::open(tmp.path()).await.is_err());
    Ok(())
}

#[tokio::test]
async fn open_attaches_to_a_persisted_store() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    {
        let store = VectorStore::create(tmp.path()).await?;
        let (chunks, embeddings) = fixture();
        store.index_chunks(&chunks, &embeddings).await?;
    }
    let reopened = VectorStore::open(tmp.path()).await?;
    let hits = reopened.search(&[0.0, 0.0, 1.0, 0.0], 1).await?;
    assert_eq!(hits[0].chunk.content, "연차휴가는 15일");
    Ok(())
}

#[tokio::test]
async fn mismatched_embedding_counts_are_rejected() -> anyhow::Result<()> {
    let tmp = TempDir::new()?;
    let store = VectorStore::create(tmp.path()).await?;
    let (chunks, mut embeddings) = fixture();
    embeddings.pop();
    assert!(store.index_chunks(&chunks, &embeddings).await.is_err());
    Ok(())
}
