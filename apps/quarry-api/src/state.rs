use std::sync::Arc;

use quarry_service::QueryService;
use quarry_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<QueryService>,
}
impl AppState {
	pub async fn new(config: quarry_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = QueryService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
