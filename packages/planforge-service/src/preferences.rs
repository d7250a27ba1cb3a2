use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use planforge_storage::{
	models::UserPreference,
	preferences::{self, PreferenceChanges},
};

use crate::{Error, PlanService, Result};

pub const DEFAULT_RENDER_QUALITY: &str = "high";
pub const DEFAULT_WALL_HEIGHT: f64 = 2.8;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
	#[serde(default)]
	pub preferred_model: Option<String>,
	#[serde(default)]
	pub render_quality: Option<String>,
	#[serde(default)]
	pub default_wall_height: Option<f64>,
	#[serde(default)]
	pub preferences: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferenceRecord {
	pub id: Uuid,
	pub user_id: String,
	pub preferred_model: String,
	pub render_quality: String,
	pub default_wall_height: f64,
	pub preferences: Value,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<UserPreference> for PreferenceRecord {
	fn from(row: UserPreference) -> Self {
		Self {
			id: row.pref_id,
			user_id: row.user_id,
			preferred_model: row.preferred_model,
			render_quality: row.render_quality,
			default_wall_height: row.default_wall_height,
			preferences: row.preferences,
			updated_at: row.updated_at,
		}
	}
}

impl PlanService {
	/// Lazily creates the row with defaults on first read; later reads never
	/// re-default.
	pub async fn get_preferences(&self, user_id: &str) -> Result<PreferenceRecord> {
		if let Some(row) = preferences::get_preferences(&self.db.pool, user_id).await? {
			return Ok(row.into());
		}

		let defaults = self.default_preferences(user_id, OffsetDateTime::now_utc());

		preferences::insert_default_preferences(&self.db.pool, &defaults).await?;

		// Reselect; a concurrent first read may have won the insert.
		let row = preferences::get_preferences(&self.db.pool, user_id).await?.ok_or_else(|| {
			Error::Storage { message: "Preferences row missing after insert.".to_string() }
		})?;

		Ok(row.into())
	}

	/// Partial upsert keyed on the user id; absent fields keep their stored
	/// values and `updated_at` is always refreshed.
	pub async fn update_preferences(
		&self,
		user_id: &str,
		req: UpdatePreferencesRequest,
	) -> Result<PreferenceRecord> {
		let mut row = self.default_preferences(user_id, OffsetDateTime::now_utc());

		if let Some(preferred_model) = &req.preferred_model {
			row.preferred_model = preferred_model.clone();
		}
		if let Some(render_quality) = &req.render_quality {
			row.render_quality = render_quality.clone();
		}
		if let Some(default_wall_height) = req.default_wall_height {
			row.default_wall_height = default_wall_height;
		}
		if let Some(preferences) = &req.preferences {
			row.preferences = preferences.clone();
		}

		let changes = PreferenceChanges {
			preferred_model: req.preferred_model.as_deref(),
			render_quality: req.render_quality.as_deref(),
			default_wall_height: req.default_wall_height,
			preferences: req.preferences.as_ref(),
		};

		preferences::upsert_preferences(&self.db.pool, &row, &changes).await?;

		self.get_preferences(user_id).await
	}

	fn default_preferences(&self, user_id: &str, now: OffsetDateTime) -> UserPreference {
		UserPreference {
			pref_id: Uuid::new_v4(),
			user_id: user_id.to_string(),
			preferred_model: self.cfg.providers.default_model.clone(),
			render_quality: DEFAULT_RENDER_QUALITY.to_string(),
			default_wall_height: DEFAULT_WALL_HEIGHT,
			preferences: Value::Object(Default::default()),
			updated_at: now,
		}
	}
}
