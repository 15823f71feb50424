use time::{Date, OffsetDateTime};

use crate::{Error, QueryService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ContentFetchResponse {
	pub id: i64,
	pub user_id: String,
	pub file_name: String,
	pub file_type: String,
	#[serde(with = "time::serde::rfc3339")]
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

impl QueryService {
	pub async fn get_content(&self, id: i64) -> Result<ContentFetchResponse> {
		let Some(content) = self.catalog.content_by_id(id).await? else {
			return Err(Error::NotFound { message: "Content not found".to_string() });
		};

		Ok(ContentFetchResponse {
			id: content.id,
			user_id: content.user_id,
			file_name: content.file_name,
			file_type: content.file_type,
			upload_date: content.upload_date,
			file_size: content.file_size,
			s3_key: content.s3_key,
			chunk_count: content.chunk_count,
			custom_prompt: content.custom_prompt,
			title: content.title,
			author: content.author,
			publication_date: content.publication_date,
			publisher: content.publisher,
			source_language: content.source_language,
			genre: content.genre,
			topic: content.topic,
		})
	}
}
