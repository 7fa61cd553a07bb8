use std::collections::HashSet;
use std::path::Path;

use anyhow::anyhow;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, Occur, Query, TermQuery};
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{doc, Index, TantivyDocument, Term};
use tracing::debug;

use docsearch_core::types::{DocumentChunk, RetrievedChunk, SourceKind};

use crate::tantivy_utils::{build_schema, register_tokenizer, CONTENT_TOKENIZER};

/// Persisted keyword index over document chunks, searched by BM25 rank.
pub struct KeywordIndex {
    index: Index,
    id_field: tantivy::schema::Field,
    source_field: tantivy::schema::Field,
    chunk_index_field: tantivy::schema::Field,
    total_chunks_field: tantivy::schema::Field,
    content_field: tantivy::schema::Field,
}

impl KeywordIndex {
    /// Build a fresh index in `index_dir`, replacing anything there.
    pub fn build(index_dir: &Path, chunks: &[DocumentChunk]) -> anyhow::Result<Self> {
        if index_dir.exists() {
            std::fs::remove_dir_all(index_dir)?;
        }
        std::fs::create_dir_all(index_dir)?;
        let schema = build_schema();
        let index = Index::create_in_dir(index_dir, schema)?;
        register_tokenizer(&index)?;
        let keyword_index = Self::bind_fields(index)?;

        let mut index_writer = keyword_index.index.writer(50_000_000)?;
        for c in chunks {
            let document = doc!(
                keyword_index.id_field => c.id.clone(),
                keyword_index.source_field => c.source_id.clone(),
                keyword_index.chunk_index_field => c.chunk_index as u64,
                keyword_index.total_chunks_field => c.total_chunks as u64,
                keyword_index.content_field => c.content.clone(),
            );
            index_writer.add_document(document)?;
        }
        index_writer.commit()?;
        debug!(chunks = chunks.len(), dir = %index_dir.display(), "keyword index built");
        Ok(keyword_index)
    }

    /// Open a previously built index. Fails when the directory holds no
    /// index, which callers treat as "keyword retrieval unavailable".
    pub fn open(index_dir: &Path) -> anyhow::Result<Self> {
        let index = Index::open_in_dir(index_dir)?;
        register_tokenizer(&index)?;
        Self::bind_fields(index)
    }

    fn bind_fields(index: Index) -> anyhow::Result<Self> {
        let schema = index.schema();
        Ok(Self {
            id_field: schema.get_field("id")?,
            source_field: schema.get_field("source")?,
            chunk_index_field: schema.get_field("chunk_index")?,
            total_chunks_field: schema.get_field("total_chunks")?,
            content_field: schema.get_field("content")?,
            index,
        })
    }

    /// Top-`k` chunks by lexical relevance, best first. An empty or
    /// untokenizable query returns no results rather than an error.
    pub fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let terms = self.tokenize(query)?;
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let clauses: Vec<(Occur, Box<dyn Query>)> = terms
            .iter()
            .map(|t| {
                (
                    Occur::Should,
                    Box::new(TermQuery::new(
                        Term::from_field_text(self.content_field, t),
                        IndexRecordOption::WithFreqs,
                    )) as Box<dyn Query>,
                )
            })
            .collect();
        let boolean_query = BooleanQuery::new(clauses);

        let reader = self.index.reader()?;
        let searcher = reader.searcher();
        let top_docs = searcher.search(&boolean_query, &TopDocs::with_limit(k))?;

        let mut hits = Vec::new();
        for (score, addr) in top_docs {
            let document: TantivyDocument = searcher.doc(addr)?;
            let chunk = self.to_chunk(&document);
            hits.push(RetrievedChunk {
                chunk,
                score,
                source: SourceKind::Keyword,
            });
        }
        Ok(hits)
    }

    fn to_chunk(&self, document: &TantivyDocument) -> DocumentChunk {
        let get_str = |field| {
            document
                .get_first(field)
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let get_u64 = |field| {
            document
                .get_first(field)
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as usize
        };
        DocumentChunk {
            id: get_str(self.id_field),
            source_id: get_str(self.source_field),
            chunk_index: get_u64(self.chunk_index_field),
            total_chunks: get_u64(self.total_chunks_field),
            content: get_str(self.content_field),
        }
    }

    /// Run the registered analyzer over the query text, deduplicating
    /// grams while keeping first-seen order.
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let mut analyzer = self
            .index
            .tokenizers()
            .get(CONTENT_TOKENIZER)
            .ok_or_else(|| anyhow!("analyzer '{CONTENT_TOKENIZER}' not registered"))?;
        let mut stream = analyzer.token_stream(text);
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        while stream.advance() {
            let token = stream.token().text.clone();
            if seen.insert(token.clone()) {
                terms.push(token);
            }
        }
        Ok(terms)
    }
}
