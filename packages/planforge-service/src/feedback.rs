use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use planforge_domain::FeedbackType;
use planforge_storage::{
	LIST_CAP, feedback,
	models::{Feedback, LearningEntry},
};

use crate::{PlanService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
	pub user_id: String,
	#[serde(default)]
	pub floor_plan_id: Option<Uuid>,
	pub feedback_type: FeedbackType,
	pub content: String,
	#[serde(default)]
	pub rating: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackRecord {
	pub id: Uuid,
	pub user_id: String,
	pub floor_plan_id: Option<Uuid>,
	pub feedback_type: String,
	pub content: String,
	pub rating: Option<i32>,
	pub applied: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Feedback> for FeedbackRecord {
	fn from(row: Feedback) -> Self {
		Self {
			id: row.feedback_id,
			user_id: row.user_id,
			floor_plan_id: row.floor_plan_id,
			feedback_type: row.feedback_type,
			content: row.content,
			rating: row.rating,
			applied: row.applied,
			created_at: row.created_at,
		}
	}
}

impl PlanService {
	/// Suggestion feedback also appends one learning-data entry; nothing
	/// reads those back yet.
	pub async fn create_feedback(&self, req: CreateFeedbackRequest) -> Result<FeedbackRecord> {
		let now = OffsetDateTime::now_utc();
		let row = Feedback {
			feedback_id: Uuid::new_v4(),
			user_id: req.user_id,
			floor_plan_id: req.floor_plan_id,
			feedback_type: req.feedback_type.as_str().to_string(),
			content: req.content,
			rating: req.rating,
			applied: false,
			created_at: now,
		};

		feedback::insert_feedback(&self.db.pool, &row).await?;

		if req.feedback_type == FeedbackType::Suggestion {
			let entry = LearningEntry {
				entry_id: Uuid::new_v4(),
				user_id: row.user_id.clone(),
				r#type: FeedbackType::Suggestion.as_str().to_string(),
				content: row.content.clone(),
				ts: now,
			};

			feedback::insert_learning_entry(&self.db.pool, &entry).await?;
		}

		Ok(row.into())
	}

	pub async fn list_feedback(&self, user_id: Option<&str>) -> Result<Vec<FeedbackRecord>> {
		let rows = feedback::list_feedback(&self.db.pool, user_id, LIST_CAP).await?;

		Ok(rows.into_iter().map(FeedbackRecord::from).collect())
	}
}
