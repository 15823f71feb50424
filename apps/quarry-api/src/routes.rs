use axum::{
	Json, Router,
	body::Body,
	extract::{Path, Query, State},
	http::{HeaderMap, Request, StatusCode},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use quarry_scorer::{HEADER_API_KEY, HEADER_CORRELATION_ID};
use quarry_service::{
	ChunkFetchResponse, ContentFetchResponse, Error as ServiceError, SearchRequest, SearchResponse,
};

use crate::{AuthGate, state::AppState};

pub fn router(state: AppState, auth_gate: AuthGate) -> Router {
	let api = Router::new()
		.route("/api/search", get(search))
		.route("/api/content/{id}", get(content))
		.route("/api/chunk/{id}", get(chunk))
		.layer(middleware::from_fn_with_state(auth_gate, auth_middleware))
		// Outermost, so rejected requests are logged too.
		.layer(middleware::from_fn(log_request))
		.with_state(state);

	Router::new().route("/health", get(health)).merge(api)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchParams {
	user_id: Option<String>,
	query: Option<String>,
	content_id: Option<i64>,
	limit: Option<u32>,
}

async fn search(
	State(state): State<AppState>,
	Query(params): Query<SearchParams>,
	headers: HeaderMap,
) -> Result<Json<SearchResponse>, ApiError> {
	let request = SearchRequest {
		user_id: params.user_id,
		query: params.query,
		content_id: params.content_id,
		limit: params.limit,
		correlation_id: read_correlation_id(&headers),
	};
	let response = state.service.search(request).await?;

	Ok(Json(response))
}

async fn content(
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Json<ContentFetchResponse>, ApiError> {
	let response = state.service.get_content(id).await?;

	Ok(Json(response))
}

async fn chunk(
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Json<ChunkFetchResponse>, ApiError> {
	let response = state.service.get_chunk(id).await?;

	Ok(Json(response))
}

fn read_correlation_id(headers: &HeaderMap) -> Option<String> {
	let raw = headers.get(HEADER_CORRELATION_ID)?;
	let value = raw.to_str().ok()?.trim();

	if value.is_empty() { None } else { Some(value.to_string()) }
}

async fn log_request(req: Request<Body>, next: Next) -> Response {
	let (method, path, correlation_id) = describe_request(&req);

	tracing::info!(%method, %path, correlation_id = correlation_id.as_deref(), "Inbound request.");

	next.run(req).await
}

fn describe_request(req: &Request<Body>) -> (axum::http::Method, String, Option<String>) {
	(req.method().clone(), req.uri().path().to_string(), read_correlation_id(req.headers()))
}

async fn auth_middleware(
	State(auth_gate): State<AuthGate>,
	req: Request<Body>,
	next: Next,
) -> Response {
	if !is_authorized(req.headers(), &auth_gate) {
		return ApiError {
			status: StatusCode::UNAUTHORIZED,
			message: "Invalid or missing API key".to_string(),
		}
		.into_response();
	}

	next.run(req).await
}

fn is_authorized(headers: &HeaderMap, auth_gate: &AuthGate) -> bool {
	match auth_gate {
		AuthGate::Off => true,
		AuthGate::StaticKey { api_key } => headers
			.get(HEADER_API_KEY)
			.and_then(|raw| raw.to_str().ok())
			.is_some_and(|presented| presented == api_key),
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::MissingParameter { .. } =>
				Self { status: StatusCode::BAD_REQUEST, message: err.to_string() },
			ServiceError::NotFound { message } => Self { status: StatusCode::NOT_FOUND, message },
			ServiceError::ScorerUnavailable { .. }
			| ServiceError::DanglingEmbedding { .. }
			| ServiceError::Storage { .. } => {
				// The cause stays in the logs; callers only learn that we failed.
				tracing::error!(error = %err, "Request failed.");

				Self {
					status: StatusCode::INTERNAL_SERVER_ERROR,
					message: "Internal server error".to_string(),
				}
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}

#[cfg(test)]
mod tests {
	use axum::http::{HeaderMap, HeaderValue};

	use super::*;

	#[test]
	fn open_gate_admits_everyone() {
		assert!(is_authorized(&HeaderMap::new(), &AuthGate::Off));
	}

	#[test]
	fn static_key_gate_requires_the_exact_key() {
		let gate = AuthGate::StaticKey { api_key: "secret-1".to_string() };

		assert!(!is_authorized(&HeaderMap::new(), &gate));

		let mut headers = HeaderMap::new();

		headers.insert("x-api-key", HeaderValue::from_static("wrong"));

		assert!(!is_authorized(&headers, &gate));

		headers.insert("x-api-key", HeaderValue::from_static("secret-1"));

		assert!(is_authorized(&headers, &gate));
	}

	#[test]
	fn request_description_carries_method_path_and_correlation_id() {
		let req = Request::get("/api/search?user_id=51&query=anything")
			.header("X-Correlation-ID", "req-7f3a")
			.body(Body::empty())
			.expect("Request should build.");
		let (method, path, correlation_id) = describe_request(&req);

		assert_eq!(method, axum::http::Method::GET);
		assert_eq!(path, "/api/search");
		assert_eq!(correlation_id, Some("req-7f3a".to_string()));

		let bare = Request::get("/api/chunk/7")
			.body(Body::empty())
			.expect("Request should build.");
		let (_, path, correlation_id) = describe_request(&bare);

		assert_eq!(path, "/api/chunk/7");
		assert_eq!(correlation_id, None);
	}

	#[test]
	fn correlation_id_ignores_blank_values() {
		let mut headers = HeaderMap::new();

		headers.insert("x-correlation-id", HeaderValue::from_static("  "));

		assert_eq!(read_correlation_id(&headers), None);

		headers.insert("x-correlation-id", HeaderValue::from_static("req-7f3a"));

		assert_eq!(read_correlation_id(&headers), Some("req-7f3a".to_string()));
	}
}
