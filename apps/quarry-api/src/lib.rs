pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use quarry_config::Security;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = quarry_cli::VERSION,
	rename_all = "kebab",
	styles = quarry_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

/// Gate applied to every /api route. /health stays open for probes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthGate {
	Off,
	StaticKey { api_key: String },
}
impl AuthGate {
	pub fn from_security(security: &Security) -> Self {
		match &security.api_key {
			Some(api_key) => Self::StaticKey { api_key: api_key.clone() },
			None => Self::Off,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = quarry_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;

	if config.security.bind_localhost_only && !http_addr.ip().is_loopback() {
		return Err(eyre::eyre!(
			"http_bind must be a loopback address when bind_localhost_only is true."
		));
	}
	if config.security.api_key.is_none() {
		tracing::warn!("security.api_key is unset; the API accepts unauthenticated requests.");
	}

	let auth_gate = AuthGate::from_security(&config.security);
	let state = AppState::new(config).await?;
	let app = routes::router(state, auth_gate);
	let http_listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, "HTTP server listening.");

	axum::serve(http_listener, app).await?;

	Ok(())
}

fn init_tracing(config: &quarry_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
