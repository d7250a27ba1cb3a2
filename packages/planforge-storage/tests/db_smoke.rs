use time::OffsetDateTime;
use uuid::Uuid;

use planforge_config::Postgres;
use planforge_storage::{
	db::Db,
	models::{FloorPlan, UserPreference},
	plans, preferences,
};
use planforge_testkit::TestDatabase;

fn sample_plan(user_id: &str, name: &str) -> FloorPlan {
	let now = OffsetDateTime::now_utc();

	FloorPlan {
		plan_id: Uuid::new_v4(),
		user_id: user_id.to_string(),
		name: name.to_string(),
		file_type: "canvas".to_string(),
		file_url: None,
		canvas_data: Some("{\"strokes\":[]}".to_string()),
		thumbnail_url: None,
		status: "uploaded".to_string(),
		three_d_data: None,
		created_at: now,
		updated_at: now,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set PLANFORGE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");
	// A second bootstrap must be a no-op.
	db.ensure_schema().await.expect("Failed to re-ensure schema.");

	for table in
		["floor_plans", "conversations", "messages", "user_preferences", "feedback", "learning_data"]
	{
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Expected table {table} to exist.");
	}

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn floor_plan_rows_round_trip() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping floor_plan_rows_round_trip; set PLANFORGE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let plan = sample_plan("owner", "Loft");

	plans::insert_floor_plan(&db.pool, &plan).await.expect("Failed to insert plan.");

	let fetched = plans::get_floor_plan(&db.pool, plan.plan_id)
		.await
		.expect("Failed to fetch plan.")
		.expect("Plan missing after insert.");

	assert_eq!(fetched.user_id, "owner");
	assert_eq!(fetched.canvas_data, plan.canvas_data);
	// TIMESTAMPTZ storage keeps microsecond precision; equality must hold
	// after a round trip through the database.
	assert_eq!(
		fetched.created_at.unix_timestamp_nanos() / 1_000,
		plan.created_at.unix_timestamp_nanos() / 1_000
	);

	let unfiltered = plans::list_floor_plans(&db.pool, None, 1_000)
		.await
		.expect("Failed to list plans.");

	assert_eq!(unfiltered.len(), 1);

	let filtered = plans::list_floor_plans(&db.pool, Some("someone-else"), 1_000)
		.await
		.expect("Failed to list plans.");

	assert!(filtered.is_empty());

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn preference_user_id_is_unique() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping preference_user_id_is_unique; set PLANFORGE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let row = UserPreference {
		pref_id: Uuid::new_v4(),
		user_id: "unique-user".to_string(),
		preferred_model: "gpt-5".to_string(),
		render_quality: "high".to_string(),
		default_wall_height: 2.8,
		preferences: serde_json::json!({}),
		updated_at: OffsetDateTime::now_utc(),
	};

	preferences::insert_default_preferences(&db.pool, &row)
		.await
		.expect("Failed to insert preferences.");

	let duplicate = UserPreference { pref_id: Uuid::new_v4(), ..row.clone() };

	// DO NOTHING keeps the first row rather than erroring or duplicating.
	preferences::insert_default_preferences(&db.pool, &duplicate)
		.await
		.expect("Duplicate default insert should be a no-op.");

	let stored = preferences::get_preferences(&db.pool, "unique-user")
		.await
		.expect("Failed to fetch preferences.")
		.expect("Preferences missing after insert.");

	assert_eq!(stored.pref_id, row.pref_id);

	db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
