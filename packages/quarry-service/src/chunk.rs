use crate::{Error, QueryService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChunkFetchResponse {
	pub text: String,
	pub embedding_id: Option<i64>,
}

impl QueryService {
	pub async fn get_chunk(&self, id: i64) -> Result<ChunkFetchResponse> {
		let Some(chunk) = self.catalog.chunk_by_id(id).await? else {
			return Err(Error::NotFound { message: "Chunk not found".to_string() });
		};

		Ok(ChunkFetchResponse { text: chunk.chunk_text, embedding_id: chunk.embedding_id })
	}
}
