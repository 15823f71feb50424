use sqlx::PgExecutor;

use crate::{
	Result,
	models::{ChunkDetail, Content, ContentChunk, EmbeddedChunk},
};

/// Resolves the content ids an owner may search. Scoping is by owner first; an
/// optional content_id narrows the set to that one record and never widens it.
pub async fn content_ids<'e, E>(
	executor: E,
	user_id: &str,
	content_id: Option<i64>,
) -> Result<Vec<i64>>
where
	E: PgExecutor<'e>,
{
	let ids = match content_id {
		Some(content_id) => {
			sqlx::query_scalar::<_, i64>(
				"SELECT id FROM content WHERE user_id = $1 AND id = $2",
			)
			.bind(user_id)
			.bind(content_id)
			.fetch_all(executor)
			.await?
		},
		None =>
			sqlx::query_scalar::<_, i64>("SELECT id FROM content WHERE user_id = $1")
				.bind(user_id)
				.fetch_all(executor)
				.await?,
	};

	Ok(ids)
}

/// Chunks of the given content set that carry an embedding. Chunks without an
/// embedding are not candidates and are excluded here, not downstream.
pub async fn embedded_chunks<'e, E>(
	executor: E,
	content_ids: &[i64],
) -> Result<Vec<EmbeddedChunk>>
where
	E: PgExecutor<'e>,
{
	let chunks = sqlx::query_as::<_, EmbeddedChunk>(
		"\
SELECT id AS chunk_id, embedding_id
FROM content_chunk
WHERE content_id = ANY($1) AND embedding_id IS NOT NULL",
	)
	.bind(content_ids)
	.fetch_all(executor)
	.await?;

	Ok(chunks)
}

pub async fn chunk_details<'e, E>(executor: E, chunk_ids: &[i64]) -> Result<Vec<ChunkDetail>>
where
	E: PgExecutor<'e>,
{
	let details = sqlx::query_as::<_, ChunkDetail>(
		"\
SELECT
	content_chunk.id AS chunk_id,
	content_chunk.content_id,
	content.file_name,
	content_chunk.chunk_text
FROM content_chunk
JOIN content ON content.id = content_chunk.content_id
WHERE content_chunk.id = ANY($1)",
	)
	.bind(chunk_ids)
	.fetch_all(executor)
	.await?;

	Ok(details)
}

pub async fn content_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Content>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, Content>(
		"\
SELECT
	id,
	user_id,
	file_name,
	file_type,
	upload_date,
	file_size,
	s3_key,
	chunk_count,
	custom_prompt,
	title,
	author,
	publication_date,
	publisher,
	source_language,
	genre,
	topic
FROM content
WHERE id = $1
LIMIT 1",
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn chunk_by_id<'e, E>(executor: E, id: i64) -> Result<Option<ContentChunk>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, ContentChunk>(
		"\
SELECT id, content_id, chunk_order, chunk_text, embedding_id
FROM content_chunk
WHERE id = $1
LIMIT 1",
	)
	.bind(id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}
