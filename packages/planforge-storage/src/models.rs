use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FloorPlan {
	pub plan_id: Uuid,
	pub user_id: String,
	pub name: String,
	pub file_type: String,
	pub file_url: Option<String>,
	pub canvas_data: Option<String>,
	pub thumbnail_url: Option<String>,
	pub status: String,
	pub three_d_data: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Conversation {
	pub conversation_id: Uuid,
	pub user_id: String,
	pub title: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Message {
	pub message_id: Uuid,
	pub conversation_id: Uuid,
	pub role: String,
	pub content: String,
	pub model: Option<String>,
	pub ts: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserPreference {
	pub pref_id: Uuid,
	pub user_id: String,
	pub preferred_model: String,
	pub render_quality: String,
	pub default_wall_height: f64,
	pub preferences: Value,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Feedback {
	pub feedback_id: Uuid,
	pub user_id: String,
	pub floor_plan_id: Option<Uuid>,
	pub feedback_type: String,
	pub content: String,
	pub rating: Option<i32>,
	pub applied: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LearningEntry {
	pub entry_id: Uuid,
	pub user_id: String,
	pub r#type: String,
	pub content: String,
	pub ts: OffsetDateTime,
}
