use sqlx::PgExecutor;
use uuid::Uuid;

use crate::{Result, models::Message};

pub async fn insert_message<'e, E>(executor: E, message: &Message) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO messages (
\tmessage_id,
\tconversation_id,
\trole,
\tcontent,
\tmodel,
\tts
)
VALUES ($1,$2,$3,$4,$5,$6)",
	)
	.bind(message.message_id)
	.bind(message.conversation_id)
	.bind(message.role.as_str())
	.bind(message.content.as_str())
	.bind(message.model.as_deref())
	.bind(message.ts)
	.execute(executor)
	.await?;

	Ok(())
}

/// Oldest first; the relay feeds this straight to the provider as context.
pub async fn list_messages<'e, E>(
	executor: E,
	conversation_id: Uuid,
	limit: i64,
) -> Result<Vec<Message>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Message>(
		"\
SELECT message_id, conversation_id, role, content, model, ts
FROM messages
WHERE conversation_id = $1
ORDER BY ts ASC
LIMIT $2",
	)
	.bind(conversation_id)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
