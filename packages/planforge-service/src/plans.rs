use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use planforge_domain::{FileType, PlanStatus, geometry};
use planforge_storage::{LIST_CAP, models::FloorPlan, plans};

use crate::{Error, PlanService, Result};

/// Folder scoping handed to the media host for every plan upload.
pub const UPLOAD_FOLDER: &str = "floorplans";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePlanRequest {
	pub user_id: String,
	pub name: String,
	pub file_type: FileType,
	#[serde(default)]
	pub canvas_data: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdatePlanRequest {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub status: Option<PlanStatus>,
	#[serde(default)]
	pub three_d_data: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanRecord {
	pub id: Uuid,
	pub user_id: String,
	pub name: String,
	pub file_type: String,
	pub file_url: Option<String>,
	pub canvas_data: Option<String>,
	pub thumbnail_url: Option<String>,
	pub status: String,
	pub three_d_data: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<FloorPlan> for PlanRecord {
	fn from(plan: FloorPlan) -> Self {
		Self {
			id: plan.plan_id,
			user_id: plan.user_id,
			name: plan.name,
			file_type: plan.file_type,
			file_url: plan.file_url,
			canvas_data: plan.canvas_data,
			thumbnail_url: plan.thumbnail_url,
			status: plan.status,
			three_d_data: plan.three_d_data,
			created_at: plan.created_at,
			updated_at: plan.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadResponse {
	pub message: String,
	pub file_url: String,
	pub thumbnail_url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
	pub message: String,
	pub three_d_data: Value,
}

impl PlanService {
	pub async fn create_plan(&self, req: CreatePlanRequest) -> Result<PlanRecord> {
		let now = OffsetDateTime::now_utc();
		let plan = FloorPlan {
			plan_id: Uuid::new_v4(),
			user_id: req.user_id,
			name: req.name,
			file_type: req.file_type.as_str().to_string(),
			file_url: None,
			canvas_data: req.canvas_data,
			thumbnail_url: None,
			status: PlanStatus::Uploaded.as_str().to_string(),
			three_d_data: None,
			created_at: now,
			updated_at: now,
		};

		plans::insert_floor_plan(&self.db.pool, &plan).await?;

		Ok(plan.into())
	}

	pub async fn list_plans(&self, user_id: Option<&str>) -> Result<Vec<PlanRecord>> {
		let rows = plans::list_floor_plans(&self.db.pool, user_id, LIST_CAP).await?;

		Ok(rows.into_iter().map(PlanRecord::from).collect())
	}

	pub async fn get_plan(&self, plan_id: Uuid) -> Result<PlanRecord> {
		let plan = plans::get_floor_plan(&self.db.pool, plan_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Floor plan not found.".to_string() })?;

		Ok(plan.into())
	}

	pub async fn update_plan(&self, plan_id: Uuid, req: UpdatePlanRequest) -> Result<PlanRecord> {
		let now = OffsetDateTime::now_utc();
		let changes = plans::FloorPlanChanges {
			name: req.name.as_deref(),
			status: req.status.map(PlanStatus::as_str),
			three_d_data: req.three_d_data.as_deref(),
		};
		let matched = plans::update_floor_plan(&self.db.pool, plan_id, &changes, now).await?;

		if matched == 0 {
			return Err(Error::NotFound { message: "Floor plan not found.".to_string() });
		}

		self.get_plan(plan_id).await
	}

	pub async fn delete_plan(&self, plan_id: Uuid) -> Result<DeleteResponse> {
		let removed = plans::delete_floor_plan(&self.db.pool, plan_id).await?;

		if removed == 0 {
			return Err(Error::NotFound { message: "Floor plan not found.".to_string() });
		}

		Ok(DeleteResponse { message: "Floor plan deleted successfully".to_string() })
	}

	/// The plan must exist before the media host is contacted; a missing id
	/// is a Not-Found, not a silently dropped update.
	pub async fn upload_plan_file(
		&self,
		plan_id: Uuid,
		filename: &str,
		bytes: Vec<u8>,
	) -> Result<UploadResponse> {
		if plans::get_floor_plan(&self.db.pool, plan_id).await?.is_none() {
			return Err(Error::NotFound { message: "Floor plan not found.".to_string() });
		}

		let outcome = self
			.providers
			.media
			.upload(&self.cfg.media, UPLOAD_FOLDER, filename, bytes)
			.await
			.map_err(|err| Error::Upload { message: err.to_string() })?;
		let thumbnail_url =
			outcome.thumbnail_url.clone().unwrap_or_else(|| outcome.secure_url.clone());
		let now = OffsetDateTime::now_utc();

		plans::set_upload_urls(&self.db.pool, plan_id, &outcome.secure_url, &thumbnail_url, now)
			.await?;

		Ok(UploadResponse {
			message: "File uploaded successfully".to_string(),
			file_url: outcome.secure_url,
			thumbnail_url,
		})
	}

	/// Always overwrites `three_d_data` with the fixed stub payload and marks
	/// the plan ready; the uploaded source is never inspected.
	pub async fn convert_plan(&self, plan_id: Uuid) -> Result<ConvertResponse> {
		if plans::get_floor_plan(&self.db.pool, plan_id).await?.is_none() {
			return Err(Error::NotFound { message: "Floor plan not found.".to_string() });
		}

		let payload = serde_json::to_value(geometry::stub_geometry())
			.map_err(|err| Error::Storage { message: err.to_string() })?;
		let serialized = payload.to_string();
		let now = OffsetDateTime::now_utc();

		plans::set_three_d_data(
			&self.db.pool,
			plan_id,
			&serialized,
			PlanStatus::Ready.as_str(),
			now,
		)
		.await?;

		Ok(ConvertResponse { message: "Conversion completed".to_string(), three_d_data: payload })
	}
}
