use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use planforge_domain::{Role, routing};
use planforge_providers::chat::ChatMessage;
use planforge_storage::{LIST_CAP, messages, models::Message};

use crate::{PlanService, Result};

/// Fixed persona handed to every provider call.
pub const SYSTEM_PROMPT: &str = "\
Sei un assistente AI esperto in architettura e design 3D. \
Aiuti gli utenti a convertire piantine 2D in modelli 3D, suggerisci miglioramenti \
e rispondi a domande su design, rendering e layout degli spazi. Impari dalle \
preferenze degli utenti e dai loro feedback per offrire suggerimenti sempre più personalizzati.";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
	pub conversation_id: Uuid,
	pub message: String,
	#[serde(default = "default_model")]
	pub model: String,
}

fn default_model() -> String {
	routing::DEFAULT_MODEL.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
	pub message: String,
	pub model: String,
}

impl PlanService {
	pub async fn send_chat(&self, req: ChatRequest) -> Result<ChatResponse> {
		let user_message = Message {
			message_id: Uuid::new_v4(),
			conversation_id: req.conversation_id,
			role: Role::User.as_str().to_string(),
			content: req.message,
			model: None,
			ts: OffsetDateTime::now_utc(),
		};

		messages::insert_message(&self.db.pool, &user_message).await?;

		// Reload the full history so the provider sees every prior turn,
		// including the one just written.
		let history = messages::list_messages(&self.db.pool, req.conversation_id, LIST_CAP).await?;
		let context: Vec<ChatMessage> = history
			.iter()
			.map(|message| ChatMessage {
				role: message.role.clone(),
				content: message.content.clone(),
			})
			.collect();
		let route = routing::resolve(&req.model);
		// The user turn above stays persisted even when the provider call
		// fails, so history can contain unanswered user turns.
		let reply = self
			.providers
			.chat
			.complete(self.chat_provider_config(&route), &route, SYSTEM_PROMPT, &context)
			.await?;
		let tag = route.tag();
		let assistant_message = Message {
			message_id: Uuid::new_v4(),
			conversation_id: req.conversation_id,
			role: Role::Assistant.as_str().to_string(),
			content: reply.clone(),
			model: Some(tag.clone()),
			ts: OffsetDateTime::now_utc(),
		};

		messages::insert_message(&self.db.pool, &assistant_message).await?;

		Ok(ChatResponse { message: reply, model: tag })
	}
}
