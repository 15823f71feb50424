use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Content {
	pub id: i64,
	pub user_id: String,
	pub file_name: String,
	pub file_type: String,
	pub upload_date: OffsetDateTime,
	pub file_size: i64,
	pub s3_key: Option<String>,
	pub chunk_count: i32,
	pub custom_prompt: Option<String>,
	pub title: Option<String>,
	pub author: Option<String>,
	pub publication_date: Option<Date>,
	pub publisher: Option<String>,
	pub source_language: Option<String>,
	pub genre: Option<String>,
	pub topic: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentChunk {
	pub id: i64,
	pub content_id: i64,
	pub chunk_order: i32,
	pub chunk_text: String,
	pub embedding_id: Option<i64>,
}

/// A chunk eligible for similarity search. The catalog only emits rows whose
/// embedding_id is non-null, which is what lets this projection drop the Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct EmbeddedChunk {
	pub chunk_id: i64,
	pub embedding_id: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChunkDetail {
	pub chunk_id: i64,
	pub content_id: i64,
	pub file_name: String,
	pub chunk_text: String,
}
