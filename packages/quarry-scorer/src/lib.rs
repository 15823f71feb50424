pub mod similar;

pub use similar::{RankedEmbedding, similar};

use color_eyre::{Result, eyre};
use reqwest::header::{HeaderMap, HeaderName};
use serde_json::{Map, Value};

pub const HEADER_API_KEY: &str = "X-API-KEY";
pub const HEADER_CORRELATION_ID: &str = "X-Correlation-ID";

pub fn service_headers(
	api_key: &str,
	default_headers: &Map<String, Value>,
	correlation_id: Option<&str>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_static("x-api-key"), api_key.parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(eyre::eyre!("Default header values must be strings."));
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}
	if let Some(correlation_id) = correlation_id {
		headers.insert(HeaderName::from_static("x-correlation-id"), correlation_id.parse()?);
	}

	Ok(headers)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builds_service_headers_with_correlation_id() {
		let headers = service_headers("secret", &Map::new(), Some("req-42"))
			.expect("Failed to build headers.");

		assert_eq!(headers.get("X-API-KEY").and_then(|v| v.to_str().ok()), Some("secret"));
		assert_eq!(headers.get("X-Correlation-ID").and_then(|v| v.to_str().ok()), Some("req-42"));
	}

	#[test]
	fn omits_correlation_id_when_absent() {
		let headers =
			service_headers("secret", &Map::new(), None).expect("Failed to build headers.");

		assert!(headers.get("X-Correlation-ID").is_none());
	}

	#[test]
	fn rejects_non_string_default_headers() {
		let mut defaults = Map::new();

		defaults.insert("X-Extra".to_string(), serde_json::json!(7));

		assert!(service_headers("secret", &defaults, None).is_err());
	}
}
