use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, models::FloorPlan};

const SELECT_COLUMNS: &str = "\
plan_id,
\tuser_id,
\tname,
\tfile_type,
\tfile_url,
\tcanvas_data,
\tthumbnail_url,
\tstatus,
\tthree_d_data,
\tcreated_at,
\tupdated_at";

/// Partial update set; only present fields are written.
#[derive(Debug, Default)]
pub struct FloorPlanChanges<'a> {
	pub name: Option<&'a str>,
	pub status: Option<&'a str>,
	pub three_d_data: Option<&'a str>,
}

pub async fn insert_floor_plan<'e, E>(executor: E, plan: &FloorPlan) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO floor_plans (
\tplan_id,
\tuser_id,
\tname,
\tfile_type,
\tfile_url,
\tcanvas_data,
\tthumbnail_url,
\tstatus,
\tthree_d_data,
\tcreated_at,
\tupdated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)",
	)
	.bind(plan.plan_id)
	.bind(plan.user_id.as_str())
	.bind(plan.name.as_str())
	.bind(plan.file_type.as_str())
	.bind(plan.file_url.as_deref())
	.bind(plan.canvas_data.as_deref())
	.bind(plan.thumbnail_url.as_deref())
	.bind(plan.status.as_str())
	.bind(plan.three_d_data.as_deref())
	.bind(plan.created_at)
	.bind(plan.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn get_floor_plan<'e, E>(executor: E, plan_id: Uuid) -> Result<Option<FloorPlan>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, FloorPlan>(&format!(
		"\
SELECT
\t{SELECT_COLUMNS}
FROM floor_plans
WHERE plan_id = $1
LIMIT 1",
	))
	.bind(plan_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn list_floor_plans<'e, E>(
	executor: E,
	user_id: Option<&str>,
	limit: i64,
) -> Result<Vec<FloorPlan>>
where
	E: PgExecutor<'e>,
{
	let mut builder = sqlx::QueryBuilder::new(format!("SELECT {SELECT_COLUMNS} FROM floor_plans"));

	if let Some(user_id) = user_id {
		builder.push(" WHERE user_id = ");
		builder.push_bind(user_id);
	}

	builder.push(" ORDER BY created_at DESC LIMIT ");
	builder.push_bind(limit);

	let rows = builder.build_query_as().fetch_all(executor).await?;

	Ok(rows)
}

/// Returns the number of matched rows; zero means the plan does not exist.
/// `updated_at` is always refreshed, even when no other field is present.
pub async fn update_floor_plan<'e, E>(
	executor: E,
	plan_id: Uuid,
	changes: &FloorPlanChanges<'_>,
	now: OffsetDateTime,
) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let mut builder = sqlx::QueryBuilder::new("UPDATE floor_plans SET updated_at = ");

	builder.push_bind(now);

	if let Some(name) = changes.name {
		builder.push(", name = ");
		builder.push_bind(name);
	}
	if let Some(status) = changes.status {
		builder.push(", status = ");
		builder.push_bind(status);
	}
	if let Some(three_d_data) = changes.three_d_data {
		builder.push(", three_d_data = ");
		builder.push_bind(three_d_data);
	}

	builder.push(" WHERE plan_id = ");
	builder.push_bind(plan_id);

	let result = builder.build().execute(executor).await?;

	Ok(result.rows_affected())
}

pub async fn set_upload_urls<'e, E>(
	executor: E,
	plan_id: Uuid,
	file_url: &str,
	thumbnail_url: &str,
	now: OffsetDateTime,
) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE floor_plans
SET file_url = $1, thumbnail_url = $2, updated_at = $3
WHERE plan_id = $4",
	)
	.bind(file_url)
	.bind(thumbnail_url)
	.bind(now)
	.bind(plan_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

pub async fn set_three_d_data<'e, E>(
	executor: E,
	plan_id: Uuid,
	three_d_data: &str,
	status: &str,
	now: OffsetDateTime,
) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE floor_plans
SET three_d_data = $1, status = $2, updated_at = $3
WHERE plan_id = $4",
	)
	.bind(three_d_data)
	.bind(status)
	.bind(now)
	.bind(plan_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Removes the plan only; feedback and renders referencing it are left alone.
pub async fn delete_floor_plan<'e, E>(executor: E, plan_id: Uuid) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM floor_plans WHERE plan_id = $1")
		.bind(plan_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}
