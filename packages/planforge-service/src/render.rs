use serde::{Deserialize, Serialize};
use uuid::Uuid;

use planforge_storage::plans;

use crate::{Error, PlanService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderRequest {
	pub floor_plan_id: Uuid,
	#[serde(default = "default_quality")]
	pub quality: String,
	#[serde(default = "default_style")]
	pub style: String,
}

fn default_quality() -> String {
	"high".to_string()
}

fn default_style() -> String {
	"realistic".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RenderResult {
	pub status: String,
	pub quality: String,
	pub style: String,
	pub render_url: String,
	pub processing_time: String,
}

impl PlanService {
	/// No rendering happens and nothing is persisted; the result echoes the
	/// request against the plan's stored URLs.
	pub async fn create_render(&self, req: RenderRequest) -> Result<RenderResult> {
		let plan = plans::get_floor_plan(&self.db.pool, req.floor_plan_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Floor plan not found.".to_string() })?;

		// An empty string counts as missing, matching the permissive writers.
		if plan.three_d_data.as_deref().map(|data| data.is_empty()).unwrap_or(true) {
			return Err(Error::InvalidRequest {
				message: "Floor plan not converted to 3D yet.".to_string(),
			});
		}

		Ok(RenderResult {
			status: "completed".to_string(),
			quality: req.quality,
			style: req.style,
			render_url: plan.file_url.unwrap_or_default(),
			processing_time: "15s".to_string(),
		})
	}
}
