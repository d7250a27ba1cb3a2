use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use planforge_storage::{
	LIST_CAP, conversations, messages,
	models::{Conversation, Message},
};

use crate::{PlanService, Result};

pub const DEFAULT_TITLE: &str = "Nuova conversazione";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateConversationRequest {
	pub user_id: String,
	#[serde(default = "default_title")]
	pub title: String,
}

fn default_title() -> String {
	DEFAULT_TITLE.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConversationRecord {
	pub id: Uuid,
	pub user_id: String,
	pub title: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<Conversation> for ConversationRecord {
	fn from(conversation: Conversation) -> Self {
		Self {
			id: conversation.conversation_id,
			user_id: conversation.user_id,
			title: conversation.title,
			created_at: conversation.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageRecord {
	pub id: Uuid,
	pub conversation_id: Uuid,
	pub role: String,
	pub content: String,
	pub model: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
}
impl From<Message> for MessageRecord {
	fn from(message: Message) -> Self {
		Self {
			id: message.message_id,
			conversation_id: message.conversation_id,
			role: message.role,
			content: message.content,
			model: message.model,
			timestamp: message.ts,
		}
	}
}

impl PlanService {
	pub async fn create_conversation(
		&self,
		req: CreateConversationRequest,
	) -> Result<ConversationRecord> {
		let conversation = Conversation {
			conversation_id: Uuid::new_v4(),
			user_id: req.user_id,
			title: req.title,
			created_at: OffsetDateTime::now_utc(),
		};

		conversations::insert_conversation(&self.db.pool, &conversation).await?;

		Ok(conversation.into())
	}

	pub async fn list_conversations(&self, user_id: &str) -> Result<Vec<ConversationRecord>> {
		let rows = conversations::list_conversations(&self.db.pool, user_id, LIST_CAP).await?;

		Ok(rows.into_iter().map(ConversationRecord::from).collect())
	}

	/// No existence check on the conversation id; an unknown id simply
	/// yields an empty list.
	pub async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<MessageRecord>> {
		let rows = messages::list_messages(&self.db.pool, conversation_id, LIST_CAP).await?;

		Ok(rows.into_iter().map(MessageRecord::from).collect())
	}
}
