pub mod chat;
pub mod conversations;
pub mod feedback;
pub mod plans;
pub mod preferences;
pub mod render;
pub mod time_serde;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

pub use error::{Error, Result};

pub use chat::{ChatRequest, ChatResponse};
pub use conversations::{ConversationRecord, CreateConversationRequest, MessageRecord};
pub use feedback::{CreateFeedbackRequest, FeedbackRecord};
pub use plans::{
	ConvertResponse, CreatePlanRequest, DeleteResponse, PlanRecord, UpdatePlanRequest,
	UploadResponse,
};
pub use preferences::{PreferenceRecord, UpdatePreferencesRequest};
pub use render::{RenderRequest, RenderResult};

use planforge_config::{ChatProviderConfig, Config, Media};
use planforge_domain::routing::{ProviderKind, ProviderRoute};
use planforge_providers::{
	chat::{self as chat_api, ChatMessage},
	media::{self as media_api, UploadOutcome},
};
use planforge_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		route: &'a ProviderRoute,
		system: &'a str,
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait MediaUploader
where
	Self: Send + Sync,
{
	fn upload<'a>(
		&'a self,
		cfg: &'a Media,
		folder: &'a str,
		filename: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<UploadOutcome>>;
}

#[derive(Clone)]
pub struct Providers {
	pub chat: Arc<dyn ChatProvider>,
	pub media: Arc<dyn MediaUploader>,
}

struct DefaultProviders;

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		route: &'a ProviderRoute,
		system: &'a str,
		history: &'a [ChatMessage],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			match route.provider {
				ProviderKind::OpenAi =>
					chat_api::openai_complete(cfg, &route.model, system, history).await,
				ProviderKind::Anthropic =>
					chat_api::anthropic_complete(cfg, &route.model, system, history).await,
			}
		})
	}
}

impl MediaUploader for DefaultProviders {
	fn upload<'a>(
		&'a self,
		cfg: &'a Media,
		folder: &'a str,
		filename: &'a str,
		bytes: Vec<u8>,
	) -> BoxFuture<'a, color_eyre::Result<UploadOutcome>> {
		Box::pin(media_api::upload(cfg, folder, filename, bytes))
	}
}

impl Providers {
	pub fn new(chat: Arc<dyn ChatProvider>, media: Arc<dyn MediaUploader>) -> Self {
		Self { chat, media }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { chat: provider.clone(), media: provider }
	}
}

pub struct PlanService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl PlanService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}

	pub(crate) fn chat_provider_config(&self, route: &ProviderRoute) -> &ChatProviderConfig {
		match route.provider {
			ProviderKind::OpenAi => &self.cfg.providers.openai,
			ProviderKind::Anthropic => &self.cfg.providers.anthropic,
		}
	}
}
