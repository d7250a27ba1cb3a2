use sqlx::PgExecutor;

use crate::{
	Result,
	models::{Feedback, LearningEntry},
};

const SELECT_COLUMNS: &str = "\
feedback_id,
\tuser_id,
\tfloor_plan_id,
\tfeedback_type,
\tcontent,
\trating,
\tapplied,
\tcreated_at";

pub async fn insert_feedback<'e, E>(executor: E, feedback: &Feedback) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO feedback (
\tfeedback_id,
\tuser_id,
\tfloor_plan_id,
\tfeedback_type,
\tcontent,
\trating,
\tapplied,
\tcreated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8)",
	)
	.bind(feedback.feedback_id)
	.bind(feedback.user_id.as_str())
	.bind(feedback.floor_plan_id)
	.bind(feedback.feedback_type.as_str())
	.bind(feedback.content.as_str())
	.bind(feedback.rating)
	.bind(feedback.applied)
	.bind(feedback.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_feedback<'e, E>(
	executor: E,
	user_id: Option<&str>,
	limit: i64,
) -> Result<Vec<Feedback>>
where
	E: PgExecutor<'e>,
{
	let mut builder = sqlx::QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM feedback"));

	if let Some(user_id) = user_id {
		builder.push(" WHERE user_id = ");
		builder.push_bind(user_id);
	}

	builder.push(" ORDER BY created_at DESC LIMIT ");
	builder.push_bind(limit);

	let rows = builder.build_query_as().fetch_all(executor).await?;

	Ok(rows)
}

/// Write-only store; nothing in the service reads these back yet.
pub async fn insert_learning_entry<'e, E>(executor: E, entry: &LearningEntry) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO learning_data (
\tentry_id,
\tuser_id,
\ttype,
\tcontent,
\tts
)
VALUES ($1,$2,$3,$4,$5)",
	)
	.bind(entry.entry_id)
	.bind(entry.user_id.as_str())
	.bind(entry.r#type.as_str())
	.bind(entry.content.as_str())
	.bind(entry.ts)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn count_learning_entries<'e, E>(executor: E, user_id: &str) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	let count: i64 = sqlx::query_scalar("SELECT count(*) FROM learning_data WHERE user_id = $1")
		.bind(user_id)
		.fetch_one(executor)
		.await?;

	Ok(count)
}
