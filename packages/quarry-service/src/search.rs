use std::collections::HashMap;

use quarry_scorer::RankedEmbedding;
use quarry_storage::models::{ChunkDetail, EmbeddedChunk};
use tracing::debug;

use crate::{CandidateChunks, Error, QueryService, Result};

pub const MSG_NO_CONTENT: &str = "No content found for this user";
pub const MSG_NO_EMBEDDINGS: &str = "No embeddings found for this user's content";
pub const MSG_COMPLETED: &str = "Search completed successfully";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub user_id: Option<String>,
	pub query: Option<String>,
	pub content_id: Option<i64>,
	pub limit: Option<u32>,
	/// Forwarded unchanged to the scorer for cross-service correlation.
	pub correlation_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResult {
	pub chunk_id: i64,
	pub content_id: i64,
	pub file_name: String,
	pub text: String,
	pub similarity_score: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub message: String,
	pub results: Vec<SearchResult>,
}

/// Request-local association between candidate embedding ids and the chunks
/// they belong to. Built fresh per search, discarded afterward.
#[derive(Debug)]
struct EmbeddingIndex {
	by_embedding: HashMap<i64, i64>,
	embedding_ids: Vec<i64>,
}
impl EmbeddingIndex {
	fn build(chunks: &[EmbeddedChunk]) -> Self {
		let mut by_embedding = HashMap::with_capacity(chunks.len());

		// Should two chunks ever share an embedding_id, the later row wins. That is
		// an upstream data-quality issue this index does not defend against.
		for chunk in chunks {
			by_embedding.insert(chunk.embedding_id, chunk.chunk_id);
		}

		let embedding_ids = by_embedding.keys().copied().collect();

		Self { by_embedding, embedding_ids }
	}

	fn chunk_id(&self, embedding_id: i64) -> Option<i64> {
		self.by_embedding.get(&embedding_id).copied()
	}

	fn embedding_ids(&self) -> &[i64] {
		&self.embedding_ids
	}
}

impl QueryService {
	/// Runs the full pipeline: resolve the owner's embedded chunks, score them
	/// remotely, and reassemble the ranked ids into text fragments.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let (user_id, query) = validate_params(&req)?;
		let limit = req
			.limit
			.unwrap_or(self.cfg.search.default_limit)
			.min(self.cfg.search.max_limit);
		let chunks = match self.catalog.candidate_chunks(user_id, req.content_id).await? {
			CandidateChunks::NoContent =>
				return Ok(SearchResponse { message: MSG_NO_CONTENT.to_string(), results: vec![] }),
			CandidateChunks::NoEmbeddings =>
				return Ok(SearchResponse {
					message: MSG_NO_EMBEDDINGS.to_string(),
					results: vec![],
				}),
			CandidateChunks::Found(chunks) => chunks,
		};
		let index = EmbeddingIndex::build(&chunks);

		debug!(candidates = index.embedding_ids().len(), limit, "Scoring candidate embeddings.");

		let mut ranked = self
			.scorer
			.similar(
				&self.cfg.scorer,
				query,
				index.embedding_ids(),
				limit,
				req.correlation_id.as_deref(),
			)
			.await
			.map_err(|err| Error::ScorerUnavailable { message: err.to_string() })?;

		// The scorer already honors the limit; truncation covers a misbehaving one.
		ranked.truncate(limit as usize);

		let chunk_ids = resolve_chunk_ids(&ranked, &index)?;
		let details = self.catalog.chunk_details(&chunk_ids).await?;
		let results = assemble(&ranked, &index, &details)?;

		Ok(SearchResponse { message: MSG_COMPLETED.to_string(), results })
	}
}

fn validate_params(req: &SearchRequest) -> Result<(&str, &str)> {
	let user_id = req.user_id.as_deref().filter(|value| !value.trim().is_empty());
	let query = req.query.as_deref().filter(|value| !value.trim().is_empty());

	match (user_id, query) {
		(Some(user_id), Some(query)) => Ok((user_id, query)),
		(user_id, query) => {
			let mut fields = Vec::new();

			if user_id.is_none() {
				fields.push("user_id".to_string());
			}
			if query.is_none() {
				fields.push("query".to_string());
			}

			Err(Error::MissingParameter { fields })
		},
	}
}

/// Every ranked id must resolve through the index. A miss means the scorer
/// answered with an id outside the candidate set it was given, which is a
/// fatal consistency violation for this request rather than a row to skip.
fn resolve_chunk_ids(ranked: &[RankedEmbedding], index: &EmbeddingIndex) -> Result<Vec<i64>> {
	ranked
		.iter()
		.map(|candidate| {
			index
				.chunk_id(candidate.id)
				.ok_or(Error::DanglingEmbedding { embedding_id: candidate.id })
		})
		.collect()
}

fn assemble(
	ranked: &[RankedEmbedding],
	index: &EmbeddingIndex,
	details: &[ChunkDetail],
) -> Result<Vec<SearchResult>> {
	let by_chunk: HashMap<i64, &ChunkDetail> =
		details.iter().map(|detail| (detail.chunk_id, detail)).collect();
	let mut results = Vec::with_capacity(ranked.len());

	for candidate in ranked {
		let chunk_id = index
			.chunk_id(candidate.id)
			.ok_or(Error::DanglingEmbedding { embedding_id: candidate.id })?;
		let detail = by_chunk.get(&chunk_id).ok_or_else(|| Error::Storage {
			message: format!("Chunk {chunk_id} vanished during result assembly."),
		})?;

		results.push(SearchResult {
			chunk_id,
			content_id: detail.content_id,
			file_name: detail.file_name.clone(),
			text: detail.chunk_text.clone(),
			similarity_score: candidate.similarity_score,
		});
	}

	// Score descending; chunk_id ascending breaks ties deterministically.
	results.sort_by(|a, b| {
		b.similarity_score.total_cmp(&a.similarity_score).then(a.chunk_id.cmp(&b.chunk_id))
	});

	Ok(results)
}
