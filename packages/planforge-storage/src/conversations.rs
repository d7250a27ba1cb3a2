use sqlx::PgExecutor;

use crate::{Result, models::Conversation};

pub async fn insert_conversation<'e, E>(executor: E, conversation: &Conversation) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO conversations (
\tconversation_id,
\tuser_id,
\ttitle,
\tcreated_at
)
VALUES ($1,$2,$3,$4)",
	)
	.bind(conversation.conversation_id)
	.bind(conversation.user_id.as_str())
	.bind(conversation.title.as_str())
	.bind(conversation.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_conversations<'e, E>(
	executor: E,
	user_id: &str,
	limit: i64,
) -> Result<Vec<Conversation>>
where
	E: PgExecutor<'e>,
{
	let rows = sqlx::query_as::<_, Conversation>(
		"\
SELECT conversation_id, user_id, title, created_at
FROM conversations
WHERE user_id = $1
ORDER BY created_at DESC
LIMIT $2",
	)
	.bind(user_id)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}
