//! Index lifecycle and question answering.
//!
//! Each rebuild writes a fresh versioned snapshot directory under the
//! index root (`v-<millis>/{keyword,vector}`) and swaps it in atomically
//! behind a lock, so queries in flight keep reading the old snapshot.
//! Older snapshot directories are pruned after the swap.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use docsearch_core::chunker::{split_document, ChunkerConfig};
use docsearch_core::error::Error;
use docsearch_core::traits::{Embedder, LanguageModel};
use docsearch_core::types::{Answer, DocumentChunk, IndexReport, RetrievedChunk};
use docsearch_extract::load_documents;
use docsearch_text::KeywordIndex;
use docsearch_vector::VectorStore;

use crate::merge::{merge_ranked, MergePolicy};
use crate::prompt::{build_prompt, NOT_INDEXED_MESSAGE};

const VERSION_PREFIX: &str = "v-";
const KEYWORD_SUBDIR: &str = "keyword";
const VECTOR_SUBDIR: &str = "vector";
const EMBED_BATCH: usize = 32;

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Root directory holding versioned index snapshots.
    pub index_dir: PathBuf,
    /// Passage count returned per question.
    pub top_k: usize,
    pub merge_policy: MergePolicy,
    pub chunker: ChunkerConfig,
}

impl EngineSettings {
    pub fn new(index_dir: impl Into<PathBuf>) -> Self {
        Self {
            index_dir: index_dir.into(),
            top_k: 5,
            merge_policy: MergePolicy::default(),
            chunker: ChunkerConfig::default(),
        }
    }
}

/// One immutable index snapshot. The keyword side is optional: a snapshot
/// whose tantivy directory is missing or damaged still serves semantic
/// search.
pub struct IndexHandle {
    keyword: Option<KeywordIndex>,
    vector: VectorStore,
}

pub struct SearchEngine {
    settings: EngineSettings,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LanguageModel>,
    index: RwLock<Option<Arc<IndexHandle>>>,
}

impl SearchEngine {
    pub fn new(
        settings: EngineSettings,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        Self { settings, embedder, llm, index: RwLock::new(None) }
    }

    pub fn is_indexed(&self) -> bool {
        self.current().is_some()
    }

    /// Attach the newest on-disk snapshot, if any. Returns whether an
    /// index is now attached.
    pub async fn load_index(&self) -> bool {
        let Some(dir) = latest_version_dir(&self.settings.index_dir) else {
            return false;
        };
        match self.open_snapshot(&dir).await {
            Ok(handle) => {
                info!(snapshot = %dir.display(), "attached index snapshot");
                self.swap(Some(Arc::new(handle)));
                true
            }
            Err(e) => {
                warn!(snapshot = %dir.display(), error = %e, "snapshot unusable");
                false
            }
        }
    }

    /// Extract, chunk, embed and index every supported document under
    /// `roots`. On success the new snapshot replaces the current one and
    /// older snapshots are deleted.
    pub async fn build_index(&self, roots: &[PathBuf]) -> Result<IndexReport> {
        let documents = load_documents(roots);
        if documents.is_empty() {
            warn!("no readable documents found, keeping current index");
            return Ok(IndexReport { document_count: 0, chunk_count: 0 });
        }

        let mut chunks: Vec<DocumentChunk> = Vec::new();
        for doc in &documents {
            chunks.extend(split_document(doc, &self.settings.chunker));
        }
        if chunks.is_empty() {
            warn!("documents produced no chunks, keeping current index");
            return Ok(IndexReport { document_count: documents.len(), chunk_count: 0 });
        }
        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "indexing corpus"
        );

        let embeddings = self.embed_all(&chunks).await?;

        let version_dir = next_version_dir(&self.settings.index_dir)?;
        let keyword = KeywordIndex::build(&version_dir.join(KEYWORD_SUBDIR), &chunks)
            .context("building keyword index")?;
        let vector = VectorStore::create(&version_dir.join(VECTOR_SUBDIR))
            .await
            .context("creating vector store")?;
        vector
            .index_chunks(&chunks, &embeddings)
            .await
            .context("writing vector store")?;

        self.swap(Some(Arc::new(IndexHandle { keyword: Some(keyword), vector })));
        prune_versions(&self.settings.index_dir, &version_dir);

        Ok(IndexReport {
            document_count: documents.len(),
            chunk_count: chunks.len(),
        })
    }

    /// Answer a question from the indexed corpus. Without an index this
    /// returns the fixed notice and never calls the language model.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let handle = match self.current() {
            Some(h) => h,
            None => {
                if self.load_index().await {
                    self.current().ok_or_else(|| anyhow!("index detached during load"))?
                } else {
                    return Ok(Answer {
                        text: NOT_INDEXED_MESSAGE.to_string(),
                        passages: Vec::new(),
                    });
                }
            }
        };

        let passages = self
            .retrieve(&handle, question)
            .await
            .map_err(|e| Error::Retriever(format!("{e:#}")))?;
        let prompt = build_prompt(&passages, question);
        let text = self
            .llm
            .generate(&prompt)
            .await
            .map_err(|e| Error::Synthesis(format!("{e:#}")))?;
        Ok(Answer { text, passages })
    }

    /// Hybrid retrieval against one snapshot.
    async fn retrieve(
        &self,
        handle: &IndexHandle,
        question: &str,
    ) -> Result<Vec<RetrievedChunk>> {
        let k = self.settings.top_k;
        let query_vec = self
            .embedder
            .embed_batch(&[question.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("embedder returned no vector for query"))?;
        let semantic = handle.vector.search(&query_vec, k).await?;

        let keyword = match &handle.keyword {
            Some(index) => index.search(question, k)?,
            None => Vec::new(),
        };
        if keyword.is_empty() {
            debug!(semantic = semantic.len(), "semantic-only retrieval");
        } else {
            debug!(
                keyword = keyword.len(),
                semantic = semantic.len(),
                "hybrid retrieval"
            );
        }
        Ok(merge_ranked(&keyword, &semantic, k, &self.settings.merge_policy))
    }

    async fn embed_all(&self, chunks: &[DocumentChunk]) -> Result<Vec<Vec<f32>>> {
        let pb = ProgressBar::new(chunks.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("embedding");

        let mut embeddings = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH) {
            let texts: Vec<String> =
                batch.iter().map(|c| c.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            embeddings.extend(vectors);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        Ok(embeddings)
    }

    async fn open_snapshot(&self, dir: &Path) -> Result<IndexHandle> {
        let vector = VectorStore::open(&dir.join(VECTOR_SUBDIR)).await?;
        let keyword = match KeywordIndex::open(&dir.join(KEYWORD_SUBDIR)) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(error = %e, "keyword index missing, semantic-only mode");
                None
            }
        };
        Ok(IndexHandle { keyword, vector })
    }

    fn current(&self) -> Option<Arc<IndexHandle>> {
        self.index.read().ok().and_then(|guard| guard.clone())
    }

    fn swap(&self, handle: Option<Arc<IndexHandle>>) {
        if let Ok(mut guard) = self.index.write() {
            *guard = handle;
        }
    }
}

fn latest_version_dir(index_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(index_dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            let stamp: u128 = name.strip_prefix(VERSION_PREFIX)?.parse().ok()?;
            Some((stamp, e.path()))
        })
        .max_by_key(|(stamp, _)| *stamp)
        .map(|(_, path)| path)
}

fn next_version_dir(index_dir: &Path) -> Result<PathBuf> {
    let mut stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow!("system clock before epoch: {e}"))?
        .as_millis();
    loop {
        let candidate = index_dir.join(format!("{VERSION_PREFIX}{stamp}"));
        if !candidate.exists() {
            fs::create_dir_all(&candidate)
                .with_context(|| format!("creating {}", candidate.display()))?;
            return Ok(candidate);
        }
        stamp += 1;
    }
}

fn prune_versions(index_dir: &Path, keep: &Path) {
    let Ok(entries) = fs::read_dir(index_dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path == keep || !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(VERSION_PREFIX) {
            continue;
        }
        if let Err(e) = fs::remove_dir_all(&path) {
            debug!(snapshot = %path.display(), error = %e, "prune failed");
        }
    }
}
