pub mod chunk;
pub mod content;
pub mod search;

mod error;

pub use chunk::ChunkFetchResponse;
pub use content::ContentFetchResponse;
pub use error::{Error, Result};
pub use search::{SearchRequest, SearchResponse, SearchResult};

use std::{future::Future, pin::Pin, sync::Arc};

use quarry_config::{Config, ScorerConfig};
use quarry_scorer::RankedEmbedding;
use quarry_storage::{
	catalog, db::Db,
	models::{ChunkDetail, Content, ContentChunk, EmbeddedChunk},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Candidate resolution outcome. The two empty variants are distinct so the
/// search pipeline can answer with the right informational message instead of
/// calling the scorer with nothing to score.
#[derive(Debug)]
pub enum CandidateChunks {
	NoContent,
	NoEmbeddings,
	Found(Vec<EmbeddedChunk>),
}

/// Read-only view over stored content, scoped by owner. Injected so the
/// pipeline can be exercised against an in-memory catalog in tests.
pub trait ContentCatalog
where
	Self: Send + Sync,
{
	fn candidate_chunks<'a>(
		&'a self,
		user_id: &'a str,
		content_id: Option<i64>,
	) -> BoxFuture<'a, Result<CandidateChunks>>;

	fn chunk_details<'a>(&'a self, chunk_ids: &'a [i64]) -> BoxFuture<'a, Result<Vec<ChunkDetail>>>;

	fn content_by_id(&self, id: i64) -> BoxFuture<'_, Result<Option<Content>>>;

	fn chunk_by_id(&self, id: i64) -> BoxFuture<'_, Result<Option<ContentChunk>>>;
}

pub trait SimilarityScorer
where
	Self: Send + Sync,
{
	fn similar<'a>(
		&'a self,
		cfg: &'a ScorerConfig,
		query: &'a str,
		embedding_ids: &'a [i64],
		limit: u32,
		correlation_id: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RankedEmbedding>>>;
}

pub struct QueryService {
	pub cfg: Config,
	pub catalog: Arc<dyn ContentCatalog>,
	pub scorer: Arc<dyn SimilarityScorer>,
}
impl QueryService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self {
			cfg,
			catalog: Arc::new(PgCatalog { db }),
			scorer: Arc::new(DefaultScorer),
		}
	}

	pub fn with_parts(
		cfg: Config,
		catalog: Arc<dyn ContentCatalog>,
		scorer: Arc<dyn SimilarityScorer>,
	) -> Self {
		Self { cfg, catalog, scorer }
	}
}

struct PgCatalog {
	db: Db,
}
impl ContentCatalog for PgCatalog {
	fn candidate_chunks<'a>(
		&'a self,
		user_id: &'a str,
		content_id: Option<i64>,
	) -> BoxFuture<'a, Result<CandidateChunks>> {
		Box::pin(async move {
			let content_ids = catalog::content_ids(&self.db.pool, user_id, content_id).await?;

			if content_ids.is_empty() {
				return Ok(CandidateChunks::NoContent);
			}

			let chunks = catalog::embedded_chunks(&self.db.pool, &content_ids).await?;

			if chunks.is_empty() {
				return Ok(CandidateChunks::NoEmbeddings);
			}

			Ok(CandidateChunks::Found(chunks))
		})
	}

	fn chunk_details<'a>(
		&'a self,
		chunk_ids: &'a [i64],
	) -> BoxFuture<'a, Result<Vec<ChunkDetail>>> {
		Box::pin(async move { Ok(catalog::chunk_details(&self.db.pool, chunk_ids).await?) })
	}

	fn content_by_id(&self, id: i64) -> BoxFuture<'_, Result<Option<Content>>> {
		Box::pin(async move { Ok(catalog::content_by_id(&self.db.pool, id).await?) })
	}

	fn chunk_by_id(&self, id: i64) -> BoxFuture<'_, Result<Option<ContentChunk>>> {
		Box::pin(async move { Ok(catalog::chunk_by_id(&self.db.pool, id).await?) })
	}
}

struct DefaultScorer;
impl SimilarityScorer for DefaultScorer {
	fn similar<'a>(
		&'a self,
		cfg: &'a ScorerConfig,
		query: &'a str,
		embedding_ids: &'a [i64],
		limit: u32,
		correlation_id: Option<&'a str>,
	) -> BoxFuture<'a, color_eyre::Result<Vec<RankedEmbedding>>> {
		Box::pin(quarry_scorer::similar(cfg, query, embedding_ids, limit, correlation_id))
	}
}
