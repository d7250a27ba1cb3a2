use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub media: Media,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Comma-separated on the environment side; `["*"]` allows any origin.
	pub cors_origins: Vec<String>,
}
impl Default for Service {
	fn default() -> Self {
		Self {
			http_bind: "127.0.0.1:8000".to_string(),
			log_level: "info".to_string(),
			cors_origins: vec!["*".to_string()],
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}
impl Default for Postgres {
	fn default() -> Self {
		Self { dsn: String::new(), pool_max_conns: 5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Media {
	pub api_base: String,
	pub cloud_name: String,
	pub api_key: String,
	pub api_secret: String,
	pub timeout_ms: u64,
}
impl Default for Media {
	fn default() -> Self {
		Self {
			api_base: "https://api.cloudinary.com".to_string(),
			cloud_name: String::new(),
			api_key: String::new(),
			api_secret: String::new(),
			timeout_ms: 30_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub default_model: String,
	pub openai: ChatProviderConfig,
	pub anthropic: ChatProviderConfig,
}
impl Default for Providers {
	fn default() -> Self {
		Self {
			default_model: "gpt-5".to_string(),
			openai: ChatProviderConfig {
				provider_id: "openai".to_string(),
				api_base: "https://api.openai.com/v1".to_string(),
				api_key: String::new(),
				path: "/chat/completions".to_string(),
				max_tokens: 1_024,
				timeout_ms: 60_000,
				default_headers: Map::new(),
			},
			anthropic: ChatProviderConfig {
				provider_id: "anthropic".to_string(),
				api_base: "https://api.anthropic.com".to_string(),
				api_key: String::new(),
				path: "/v1/messages".to_string(),
				max_tokens: 1_024,
				timeout_ms: 60_000,
				default_headers: Map::from_iter([(
					"anthropic-version".to_string(),
					Value::String("2023-06-01".to_string()),
				)]),
			},
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
