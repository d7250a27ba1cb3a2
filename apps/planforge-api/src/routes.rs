use axum::{
	Json, Router,
	extract::{Multipart, Path, Query, State},
	http::{HeaderValue, StatusCode},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
	cors::{AllowOrigin, Any, CorsLayer},
	trace::TraceLayer,
};
use uuid::Uuid;

use planforge_service::{
	ChatRequest, ChatResponse, ConversationRecord, ConvertResponse, CreateConversationRequest,
	CreateFeedbackRequest, CreatePlanRequest, DeleteResponse, Error as ServiceError,
	FeedbackRecord, MessageRecord, PlanRecord, PreferenceRecord, RenderRequest, RenderResult,
	UpdatePlanRequest, UpdatePreferencesRequest, UploadResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_origins);

	Router::new()
		.route("/api", get(root))
		.route("/api/floorplans", post(create_floorplan).get(list_floorplans))
		.route(
			"/api/floorplans/{id}",
			get(get_floorplan).patch(update_floorplan).delete(delete_floorplan),
		)
		.route("/api/floorplans/{id}/upload", post(upload_floorplan_file))
		.route("/api/floorplans/{id}/convert-3d", post(convert_floorplan))
		.route("/api/conversations", post(create_conversation).get(list_conversations))
		.route("/api/conversations/{id}/messages", get(list_messages))
		.route("/api/chat", post(chat))
		.route("/api/preferences/{user_id}", get(get_preferences).patch(update_preferences))
		.route("/api/feedback", post(create_feedback).get(list_feedback))
		.route("/api/render", post(create_render))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Wildcard origins map to `Any`; tower-http rejects wildcard combined with
/// credentials, so credentials stay off either way.
fn cors_layer(origins: &[String]) -> CorsLayer {
	let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

	if origins.iter().any(|origin| origin == "*") {
		layer.allow_origin(Any)
	} else {
		let parsed: Vec<HeaderValue> =
			origins.iter().filter_map(|origin| origin.parse().ok()).collect();

		layer.allow_origin(AllowOrigin::list(parsed))
	}
}

#[derive(Debug, Serialize)]
struct RootInfo {
	message: String,
	version: String,
}

#[derive(Debug, Deserialize)]
struct UserFilter {
	user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserQuery {
	user_id: String,
}

async fn root() -> Json<RootInfo> {
	Json(RootInfo {
		message: "3D Floor Plan API".to_string(),
		version: planforge_cli::VERSION.to_string(),
	})
}

async fn create_floorplan(
	State(state): State<AppState>,
	Json(payload): Json<CreatePlanRequest>,
) -> Result<Json<PlanRecord>, ApiError> {
	let response = state.service.create_plan(payload).await?;
	Ok(Json(response))
}

async fn list_floorplans(
	State(state): State<AppState>,
	Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<PlanRecord>>, ApiError> {
	let response = state.service.list_plans(filter.user_id.as_deref()).await?;
	Ok(Json(response))
}

async fn get_floorplan(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<PlanRecord>, ApiError> {
	let response = state.service.get_plan(id).await?;
	Ok(Json(response))
}

async fn update_floorplan(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<PlanRecord>, ApiError> {
	let response = state.service.update_plan(id, payload).await?;
	Ok(Json(response))
}

async fn delete_floorplan(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, ApiError> {
	let response = state.service.delete_plan(id).await?;
	Ok(Json(response))
}

async fn upload_floorplan_file(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
	let mut file: Option<(String, Vec<u8>)> = None;

	while let Some(field) = multipart.next_field().await.map_err(|err| {
		json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			format!("Malformed multipart body: {err}."),
		)
	})? {
		if field.name() == Some("file") {
			let filename = field.file_name().unwrap_or("upload").to_string();
			let bytes = field
				.bytes()
				.await
				.map_err(|err| {
					json_error(
						StatusCode::BAD_REQUEST,
						"invalid_request",
						format!("Failed to read file field: {err}."),
					)
				})?
				.to_vec();

			file = Some((filename, bytes));

			break;
		}
	}

	let Some((filename, bytes)) = file else {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			"Multipart body is missing a file field.",
		));
	};
	let response = state.service.upload_plan_file(id, &filename, bytes).await?;

	Ok(Json(response))
}

async fn convert_floorplan(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<ConvertResponse>, ApiError> {
	let response = state.service.convert_plan(id).await?;
	Ok(Json(response))
}

async fn create_conversation(
	State(state): State<AppState>,
	Json(payload): Json<CreateConversationRequest>,
) -> Result<Json<ConversationRecord>, ApiError> {
	let response = state.service.create_conversation(payload).await?;
	Ok(Json(response))
}

async fn list_conversations(
	State(state): State<AppState>,
	Query(query): Query<UserQuery>,
) -> Result<Json<Vec<ConversationRecord>>, ApiError> {
	let response = state.service.list_conversations(&query.user_id).await?;
	Ok(Json(response))
}

async fn list_messages(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
	let response = state.service.list_messages(id).await?;
	Ok(Json(response))
}

async fn chat(
	State(state): State<AppState>,
	Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
	let response = state.service.send_chat(payload).await?;
	Ok(Json(response))
}

async fn get_preferences(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
) -> Result<Json<PreferenceRecord>, ApiError> {
	let response = state.service.get_preferences(&user_id).await?;
	Ok(Json(response))
}

async fn update_preferences(
	State(state): State<AppState>,
	Path(user_id): Path<String>,
	Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<Json<PreferenceRecord>, ApiError> {
	let response = state.service.update_preferences(&user_id, payload).await?;
	Ok(Json(response))
}

async fn create_feedback(
	State(state): State<AppState>,
	Json(payload): Json<CreateFeedbackRequest>,
) -> Result<Json<FeedbackRecord>, ApiError> {
	let response = state.service.create_feedback(payload).await?;
	Ok(Json(response))
}

async fn list_feedback(
	State(state): State<AppState>,
	Query(filter): Query<UserFilter>,
) -> Result<Json<Vec<FeedbackRecord>>, ApiError> {
	let response = state.service.list_feedback(filter.user_id.as_deref()).await?;
	Ok(Json(response))
}

async fn create_render(
	State(state): State<AppState>,
	Json(payload): Json<RenderRequest>,
) -> Result<Json<RenderResult>, ApiError> {
	let response = state.service.create_render(payload).await?;
	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}

impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message),
			ServiceError::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message),
			ServiceError::Upload { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "upload_failed", message),
			ServiceError::Provider { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "provider_error", message),
			ServiceError::Storage { message } =>
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", message),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
