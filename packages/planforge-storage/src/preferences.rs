use serde_json::Value;
use sqlx::PgExecutor;

use crate::{Result, models::UserPreference};

/// Fields the upsert writes when present; absent fields keep their stored
/// value on conflict.
#[derive(Debug, Default)]
pub struct PreferenceChanges<'a> {
	pub preferred_model: Option<&'a str>,
	pub render_quality: Option<&'a str>,
	pub default_wall_height: Option<f64>,
	pub preferences: Option<&'a Value>,
}

pub async fn get_preferences<'e, E>(executor: E, user_id: &str) -> Result<Option<UserPreference>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, UserPreference>(
		"\
SELECT
\tpref_id,
\tuser_id,
\tpreferred_model,
\trender_quality,
\tdefault_wall_height,
\tpreferences,
\tupdated_at
FROM user_preferences
WHERE user_id = $1
LIMIT 1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

/// First-read default row. `DO NOTHING` keeps a concurrent creator's row;
/// callers reselect afterwards.
pub async fn insert_default_preferences<'e, E>(executor: E, row: &UserPreference) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO user_preferences (
\tpref_id,
\tuser_id,
\tpreferred_model,
\trender_quality,
\tdefault_wall_height,
\tpreferences,
\tupdated_at
)
VALUES ($1,$2,$3,$4,$5,$6,$7)
ON CONFLICT (user_id) DO NOTHING",
	)
	.bind(row.pref_id)
	.bind(row.user_id.as_str())
	.bind(row.preferred_model.as_str())
	.bind(row.render_quality.as_str())
	.bind(row.default_wall_height)
	.bind(&row.preferences)
	.bind(row.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Upsert keyed on `user_id`. The inserted row carries defaults merged with
/// the changes; on conflict only the present fields and `updated_at` are
/// overwritten.
pub async fn upsert_preferences<'e, E>(
	executor: E,
	row: &UserPreference,
	changes: &PreferenceChanges<'_>,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let mut builder = sqlx::QueryBuilder::new(
		"INSERT INTO user_preferences (pref_id, user_id, preferred_model, render_quality, default_wall_height, preferences, updated_at) VALUES (",
	);
	let mut values = builder.separated(", ");

	values.push_bind(row.pref_id);
	values.push_bind(row.user_id.as_str());
	values.push_bind(row.preferred_model.as_str());
	values.push_bind(row.render_quality.as_str());
	values.push_bind(row.default_wall_height);
	values.push_bind(&row.preferences);
	values.push_bind(row.updated_at);

	builder.push(") ON CONFLICT (user_id) DO UPDATE SET updated_at = ");
	builder.push_bind(row.updated_at);

	if let Some(preferred_model) = changes.preferred_model {
		builder.push(", preferred_model = ");
		builder.push_bind(preferred_model);
	}
	if let Some(render_quality) = changes.render_quality {
		builder.push(", render_quality = ");
		builder.push_bind(render_quality);
	}
	if let Some(default_wall_height) = changes.default_wall_height {
		builder.push(", default_wall_height = ");
		builder.push_bind(default_wall_height);
	}
	if let Some(preferences) = changes.preferences {
		builder.push(", preferences = ");
		builder.push_bind(preferences);
	}

	builder.build().execute(executor).await?;

	Ok(())
}
