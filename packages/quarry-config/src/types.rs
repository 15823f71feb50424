use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub scorer: ScorerConfig,
	pub search: Search,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Connection details for the external embedding-similarity service.
#[derive(Debug, Deserialize)]
pub struct ScorerConfig {
	pub api_base: String,
	#[serde(default = "default_scorer_path")]
	pub path: String,
	pub api_key: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Shared secret expected in the inbound X-API-KEY header. None disables the gate.
	pub api_key: Option<String>,
}

fn default_scorer_path() -> String {
	"/api/embedding/similar".to_string()
}

fn default_limit() -> u32 {
	5
}

fn default_max_limit() -> u32 {
	50
}
