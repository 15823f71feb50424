use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// One scored candidate as returned by the remote service. The response order
/// is authoritative; callers must not re-derive it from the scores alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEmbedding {
	pub id: i64,
	pub similarity_score: f32,
}

/// Sends the whole candidate set in a single call. The service may return
/// fewer than `limit` entries; it never returns more.
pub async fn similar(
	cfg: &quarry_config::ScorerConfig,
	query: &str,
	embedding_ids: &[i64],
	limit: u32,
	correlation_id: Option<&str>,
) -> Result<Vec<RankedEmbedding>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"text": query,
		"embedding_ids": embedding_ids,
		"limit": limit,
	});
	let res = client
		.post(url)
		.headers(crate::service_headers(&cfg.api_key, &cfg.default_headers, correlation_id)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_similar_response(json)
}

fn parse_similar_response(json: Value) -> Result<Vec<RankedEmbedding>> {
	let entries = json
		.get("similar_embeddings")
		.and_then(|v| v.as_array())
		.ok_or_else(|| eyre::eyre!("Scorer response is missing similar_embeddings array."))?;

	let mut ranked = Vec::with_capacity(entries.len());

	for entry in entries {
		let id = entry
			.get("id")
			.and_then(|v| v.as_i64())
			.ok_or_else(|| eyre::eyre!("Scorer entry missing integer id."))?;
		let similarity_score = entry
			.get("similarity_score")
			.and_then(|v| v.as_f64())
			.ok_or_else(|| eyre::eyre!("Scorer entry missing numeric similarity_score."))?
			as f32;

		ranked.push(RankedEmbedding { id, similarity_score });
	}

	Ok(ranked)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_entries_in_response_order() {
		let json = serde_json::json!({
			"similar_embeddings": [
				{ "id": 102, "similarity_score": 0.9 },
				{ "id": 101, "similarity_score": 0.5 }
			]
		});
		let ranked = parse_similar_response(json).expect("parse failed");

		assert_eq!(
			ranked,
			vec![
				RankedEmbedding { id: 102, similarity_score: 0.9 },
				RankedEmbedding { id: 101, similarity_score: 0.5 },
			]
		);
	}

	#[test]
	fn rejects_missing_similar_embeddings() {
		let json = serde_json::json!({ "results": [] });

		assert!(parse_similar_response(json).is_err());
	}

	#[test]
	fn rejects_entry_without_id() {
		let json = serde_json::json!({
			"similar_embeddings": [ { "similarity_score": 0.3 } ]
		});

		assert!(parse_similar_response(json).is_err());
	}

	#[test]
	fn accepts_an_empty_ranked_list() {
		let json = serde_json::json!({ "similar_embeddings": [] });
		let ranked = parse_similar_response(json).expect("parse failed");

		assert!(ranked.is_empty());
	}
}
