use std::sync::Arc;

use uuid::Uuid;

use planforge_config::{ChatProviderConfig, Config, Media};
use planforge_domain::{FeedbackType, FileType, PlanStatus, routing::ProviderRoute};
use planforge_providers::{
	chat::ChatMessage,
	media::UploadOutcome,
};
use planforge_service::{
	BoxFuture, ChatProvider, ChatRequest, CreateConversationRequest, CreateFeedbackRequest,
	CreatePlanRequest, MediaUploader, PlanService, Providers, RenderRequest,
	UpdatePlanRequest, UpdatePreferencesRequest,
};
use planforge_storage::db::Db;
use planforge_testkit::TestDatabase;

const STUB_FILE_URL: &str = "https://cdn.test/floorplans/plan.png";

struct StubChat;

impl ChatProvider for StubChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a ChatProviderConfig,
		route: &'a ProviderRoute,
		_system: &'a str,
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move { Ok(format!("reply[{}] after {} turns", route.model, history.len())) })
	}
}

struct StubMedia;

impl MediaUploader for StubMedia {
	fn upload<'a>(
		&'a self,
		_cfg: &'a Media,
		_folder: &'a str,
		_filename: &'a str,
		_bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<UploadOutcome>> {
		Box::pin(async move {
			Ok(UploadOutcome { secure_url: STUB_FILE_URL.to_string(), thumbnail_url: None })
		})
	}
}

fn test_config(dsn: String) -> Config {
	let mut cfg = Config::default();

	cfg.storage.postgres.dsn = dsn;
	cfg.storage.postgres.pool_max_conns = 1;

	cfg
}

async fn test_service(test_db: &TestDatabase) -> PlanService {
	let cfg = test_config(test_db.dsn().to_string());
	let db = Db::connect(&cfg.storage.postgres).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	PlanService::with_providers(cfg, db, Providers::new(Arc::new(StubChat), Arc::new(StubMedia)))
}

fn plan_request(user_id: &str, name: &str) -> CreatePlanRequest {
	CreatePlanRequest {
		user_id: user_id.to_string(),
		name: name.to_string(),
		file_type: FileType::Image,
		canvas_data: None,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn floor_plan_crud_round_trip() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping floor_plan_crud_round_trip; set PLANFORGE_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	let first = service.create_plan(plan_request("user-a", "Ground floor")).await.expect("create");
	let second = service.create_plan(plan_request("user-a", "First floor")).await.expect("create");
	let other = service.create_plan(plan_request("user-b", "Basement")).await.expect("create");

	assert_ne!(first.id, second.id);
	assert_eq!(first.status, "uploaded");

	let listed = service.list_plans(Some("user-a")).await.expect("list");

	assert_eq!(listed.len(), 2);
	assert!(listed.iter().all(|plan| plan.user_id == "user-a"));
	// Newest first.
	assert!(listed[0].created_at >= listed[1].created_at);

	let fetched = service.get_plan(first.id).await.expect("get");

	assert_eq!(fetched.name, "Ground floor");

	let updated = service
		.update_plan(
			first.id,
			UpdatePlanRequest {
				name: Some("Ground floor v2".to_string()),
				status: Some(PlanStatus::Processing),
				three_d_data: None,
			},
		)
		.await
		.expect("update");

	assert_eq!(updated.name, "Ground floor v2");
	assert_eq!(updated.status, "processing");
	assert!(updated.updated_at >= fetched.updated_at);

	let missing = Uuid::new_v4();

	assert!(matches!(
		service.update_plan(missing, UpdatePlanRequest::default()).await,
		Err(planforge_service::Error::NotFound { .. })
	));
	assert!(matches!(
		service.delete_plan(missing).await,
		Err(planforge_service::Error::NotFound { .. })
	));

	service.delete_plan(other.id).await.expect("delete");

	assert!(matches!(
		service.get_plan(other.id).await,
		Err(planforge_service::Error::NotFound { .. })
	));

	service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn preferences_default_once_and_upsert() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping preferences_default_once_and_upsert; set PLANFORGE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	let first = service.get_preferences("fresh-user").await.expect("get");

	assert_eq!(first.preferred_model, "gpt-5");
	assert_eq!(first.render_quality, "high");
	assert_eq!(first.default_wall_height, 2.8);
	assert_eq!(first.preferences, serde_json::json!({}));

	let second = service.get_preferences("fresh-user").await.expect("get again");

	// Same row, not a re-default.
	assert_eq!(second.id, first.id);
	assert_eq!(second.updated_at, first.updated_at);

	let updated = service
		.update_preferences(
			"fresh-user",
			UpdatePreferencesRequest {
				render_quality: Some("low".to_string()),
				..Default::default()
			},
		)
		.await
		.expect("update");

	assert_eq!(updated.render_quality, "low");
	// Untouched fields keep their stored values.
	assert_eq!(updated.preferred_model, "gpt-5");
	assert!(updated.updated_at >= first.updated_at);

	let upserted = service
		.update_preferences(
			"never-seen-user",
			UpdatePreferencesRequest {
				default_wall_height: Some(3.2),
				..Default::default()
			},
		)
		.await
		.expect("upsert");

	assert_eq!(upserted.default_wall_height, 3.2);
	assert_eq!(upserted.render_quality, "high");

	service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn suggestion_feedback_appends_learning_data() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping suggestion_feedback_appends_learning_data; set PLANFORGE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	let suggestion = service
		.create_feedback(CreateFeedbackRequest {
			user_id: "learner".to_string(),
			floor_plan_id: None,
			feedback_type: FeedbackType::Suggestion,
			content: "Add more balconies.".to_string(),
			rating: None,
		})
		.await
		.expect("suggestion feedback");

	assert!(!suggestion.applied);

	service
		.create_feedback(CreateFeedbackRequest {
			user_id: "learner".to_string(),
			floor_plan_id: None,
			feedback_type: FeedbackType::Rating,
			content: "Great output.".to_string(),
			rating: Some(5),
		})
		.await
		.expect("rating feedback");

	let learned = planforge_storage::feedback::count_learning_entries(&service.db.pool, "learner")
		.await
		.expect("count learning entries");

	assert_eq!(learned, 1);

	let listed = service.list_feedback(Some("learner")).await.expect("list feedback");

	assert_eq!(listed.len(), 2);

	service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn chat_history_alternates_and_is_ordered() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping chat_history_alternates_and_is_ordered; set PLANFORGE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	let conversation = service
		.create_conversation(CreateConversationRequest {
			user_id: "chatter".to_string(),
			title: "Nuova conversazione".to_string(),
		})
		.await
		.expect("create conversation");

	let first = service
		.send_chat(ChatRequest {
			conversation_id: conversation.id,
			message: "Quante stanze vedi?".to_string(),
			model: "gpt-5".to_string(),
		})
		.await
		.expect("first send");

	assert_eq!(first.model, "openai/gpt-5");

	let second = service
		.send_chat(ChatRequest {
			conversation_id: conversation.id,
			message: "E le finestre?".to_string(),
			model: "claude-4-sonnet-20250514".to_string(),
		})
		.await
		.expect("second send");

	assert_eq!(second.model, "anthropic/claude-4-sonnet-20250514");

	let history = service.list_messages(conversation.id).await.expect("list messages");

	assert_eq!(history.len(), 4);
	assert!(history.windows(2).all(|pair| pair[0].timestamp <= pair[1].timestamp));

	let roles: Vec<&str> = history.iter().map(|message| message.role.as_str()).collect();

	assert_eq!(roles, ["user", "assistant", "user", "assistant"]);
	assert_eq!(history[1].model.as_deref(), Some("openai/gpt-5"));

	service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set PLANFORGE_PG_DSN to run."]
async fn upload_convert_render_end_to_end() {
	let Some(base_dsn) = planforge_testkit::env_dsn() else {
		eprintln!("Skipping upload_convert_render_end_to_end; set PLANFORGE_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let service = test_service(&test_db).await;

	let plan = service.create_plan(plan_request("renderer", "Villa")).await.expect("create");

	// Rendering before conversion is a precondition failure.
	assert!(matches!(
		service
			.create_render(RenderRequest {
				floor_plan_id: plan.id,
				quality: "high".to_string(),
				style: "realistic".to_string(),
			})
			.await,
		Err(planforge_service::Error::InvalidRequest { .. })
	));

	// Uploading against an unknown plan is a Not-Found, checked before the
	// media host is contacted.
	assert!(matches!(
		service.upload_plan_file(Uuid::new_v4(), "plan.png", vec![1, 2, 3]).await,
		Err(planforge_service::Error::NotFound { .. })
	));

	let uploaded =
		service.upload_plan_file(plan.id, "plan.png", vec![1, 2, 3]).await.expect("upload");

	assert_eq!(uploaded.file_url, STUB_FILE_URL);
	// No distinct thumbnail from the host, so it falls back to the file URL.
	assert_eq!(uploaded.thumbnail_url, STUB_FILE_URL);

	let converted = service.convert_plan(plan.id).await.expect("convert");

	assert_eq!(converted.three_d_data["rooms"].as_array().map(Vec::len), Some(2));
	assert_eq!(converted.three_d_data["walls"].as_array().map(Vec::len), Some(2));
	assert_eq!(converted.three_d_data["doors"].as_array().map(Vec::len), Some(1));
	assert_eq!(converted.three_d_data["windows"].as_array().map(Vec::len), Some(1));

	let ready = service.get_plan(plan.id).await.expect("get after convert");

	assert_eq!(ready.status, "ready");
	assert_eq!(ready.file_url.as_deref(), Some(STUB_FILE_URL));

	let render = service
		.create_render(RenderRequest {
			floor_plan_id: plan.id,
			quality: "medium".to_string(),
			style: "wireframe".to_string(),
		})
		.await
		.expect("render");

	assert_eq!(render.status, "completed");
	assert_eq!(render.quality, "medium");
	assert_eq!(render.style, "wireframe");
	assert_eq!(render.render_url, STUB_FILE_URL);
	assert_eq!(render.processing_time, "15s");

	service.db.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
