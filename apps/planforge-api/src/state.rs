use std::sync::Arc;

use planforge_service::PlanService;
use planforge_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PlanService>,
}
impl AppState {
	pub async fn new(config: planforge_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = PlanService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
