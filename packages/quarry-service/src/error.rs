pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Missing required parameters: {}.", fields.join(", "))]
	MissingParameter { fields: Vec<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Scorer unavailable: {message}")]
	ScorerUnavailable { message: String },
	#[error("Scorer returned embedding id {embedding_id} outside the candidate set.")]
	DanglingEmbedding { embedding_id: i64 },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<quarry_storage::Error> for Error {
	fn from(err: quarry_storage::Error) -> Self {
		match err {
			quarry_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			quarry_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
