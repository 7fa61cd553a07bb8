use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use tracing::debug;

use docsearch_core::types::{DocumentChunk, RetrievedChunk, SourceKind};

use crate::schema::{build_arrow_schema, TABLE_NAME};

/// On-disk vector store. `create` starts a fresh database directory;
/// `open` attaches to a persisted one and fails when no chunk table
/// exists, which callers treat as "no index yet".
pub struct VectorStore {
    db: Connection,
}

impl VectorStore {
    pub async fn create(db_path: &Path) -> Result<Self> {
        if db_path.exists() {
            std::fs::remove_dir_all(db_path)?;
        }
        std::fs::create_dir_all(db_path)?;
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db })
    }

    pub async fn open(db_path: &Path) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        let names = db.table_names().execute().await?;
        if !names.contains(&TABLE_NAME.to_string()) {
            bail!("vector store at {} has no '{TABLE_NAME}' table", db_path.display());
        }
        Ok(Self { db })
    }

    /// Insert all chunks with their embeddings, batched. Every
    /// embedding must have the same length.
    pub async fn index_chunks(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<()> {
        if chunks.len() != embeddings.len() {
            bail!(
                "chunk/embedding count mismatch: {} vs {}",
                chunks.len(),
                embeddings.len()
            );
        }
        if chunks.is_empty() {
            debug!("no chunks to index");
            return Ok(());
        }
        let dim = embeddings[0].len();
        if let Some(bad) = embeddings.iter().find(|e| e.len() != dim) {
            bail!("inconsistent embedding length: expected {dim}, got {}", bad.len());
        }

        let batch_size = 1000usize;
        for (chunk_batch, embedding_batch) in
            chunks.chunks(batch_size).zip(embeddings.chunks(batch_size))
        {
            self.insert_batch(chunk_batch, embedding_batch, dim).await?;
        }
        debug!(chunks = chunks.len(), dim, "vector store indexed");
        Ok(())
    }

    async fn insert_batch(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
        dim: usize,
    ) -> Result<()> {
        let record_batch = to_record_batch(chunks, embeddings, dim)?;
        let schema = record_batch.schema();
        let reader = Box::new(RecordBatchIterator::new(
            vec![Ok(record_batch)].into_iter(),
            schema,
        ));
        if self
            .db
            .table_names()
            .execute()
            .await?
            .contains(&TABLE_NAME.to_string())
        {
            self.db
                .open_table(TABLE_NAME)
                .execute()
                .await?
                .add(reader)
                .execute()
                .await?;
        } else {
            self.db.create_table(TABLE_NAME, reader).execute().await?;
        }
        Ok(())
    }

    /// Top-`k` chunks nearest to `query_vec`, best first. Scores are
    /// `1.0 - distance` so that, as everywhere else, higher is better.
    pub async fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let table = self.db.open_table(TABLE_NAME).execute().await?;
        let mut results = table
            .vector_search(query_vec.to_vec())?
            .limit(k)
            .execute()
            .await?;

        let mut hits = Vec::new();
        while let Some(batch) = futures::TryStreamExt::try_next(&mut results).await? {
            for i in 0..batch.num_rows() {
                let get_str = |name: &str| -> Result<String> {
                    Ok(batch
                        .column_by_name(name)
                        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
                        .ok_or_else(|| anyhow!("column '{name}' missing or not a string"))?
                        .value(i)
                        .to_string())
                };
                let get_i32 = |name: &str| -> Result<i32> {
                    Ok(batch
                        .column_by_name(name)
                        .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
                        .ok_or_else(|| anyhow!("column '{name}' missing or not an int"))?
                        .value(i))
                };
                let score = if let Some(col) = batch.column_by_name("_distance") {
                    col.as_any()
                        .downcast_ref::<arrow_array::Float32Array>()
                        .map(|c| 1.0 - c.value(i))
                        .unwrap_or(0.5)
                } else if let Some(col) = batch.column_by_name("_score") {
                    col.as_any()
                        .downcast_ref::<arrow_array::Float32Array>()
                        .map(|c| c.value(i))
                        .unwrap_or(0.5)
                } else {
                    0.5
                };
                hits.push(RetrievedChunk {
                    chunk: DocumentChunk {
                        id: get_str("id")?,
                        source_id: get_str("source")?,
                        chunk_index: get_i32("chunk_index")? as usize,
                        total_chunks: get_i32("total_chunks")? as usize,
                        content: get_str("content")?,
                    },
                    score,
                    source: SourceKind::Semantic,
                });
            }
        }
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }
}

fn to_record_batch(
    chunks: &[DocumentChunk],
    embeddings: &[Vec<f32>],
    dim: usize,
) -> Result<RecordBatch> {
    let schema = build_arrow_schema(dim as i32);
    let mut ids = Vec::new();
    let mut sources = Vec::new();
    let mut chunk_indices = Vec::new();
    let mut total_chunks = Vec::new();
    let mut contents = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
    for (chunk, embedding) in chunks.iter().zip(embeddings) {
        ids.push(chunk.id.clone());
        sources.push(chunk.source_id.clone());
        chunk_indices.push(chunk.chunk_index as i32);
        total_chunks.push(chunk.total_chunks as i32);
        contents.push(chunk.content.clone());
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }
    let record_batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(sources)),
            Arc::new(Int32Array::from(chunk_indices)),
            Arc::new(Int32Array::from(total_chunks)),
            Arc::new(StringArray::from(contents)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<
                arrow_array::types::Float32Type,
                _,
                _,
            >(vectors.into_iter(), dim as i32)),
        ],
    )?;
    Ok(record_batch)
}
