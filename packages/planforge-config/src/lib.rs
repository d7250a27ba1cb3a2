mod error;
mod types;

pub use error::{Error, Result};
pub use types::{ChatProviderConfig, Config, Media, Postgres, Providers, Service, Storage};

use std::{env, fs, path::Path};

/// Loads configuration from an optional TOML file, then applies the
/// recognized environment variables on top. Environment values win.
pub fn load(path: Option<&Path>) -> Result<Config> {
	let mut cfg = match path {
		Some(path) => {
			let raw = fs::read_to_string(path)
				.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

			toml::from_str(&raw)
				.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?
		},
		None => Config::default(),
	};

	apply_env(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.cors_origins.is_empty() {
		return Err(Error::Validation {
			message: "service.cors_origins must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("media.cloud_name", &cfg.media.cloud_name),
		("media.api_key", &cfg.media.api_key),
		("media.api_secret", &cfg.media.api_secret),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.providers.default_model.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.default_model must be non-empty.".to_string(),
		});
	}

	for (label, provider) in
		[("openai", &cfg.providers.openai), ("anthropic", &cfg.providers.anthropic)]
	{
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
		if provider.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_base must be non-empty."),
			});
		}
		if provider.timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn apply_env(cfg: &mut Config) {
	if let Some(value) = env_non_empty("PLANFORGE_HTTP_BIND") {
		cfg.service.http_bind = value;
	}
	if let Some(value) = env_non_empty("PLANFORGE_LOG_LEVEL") {
		cfg.service.log_level = value;
	}
	if let Some(value) = env_non_empty("PLANFORGE_CORS_ORIGINS") {
		cfg.service.cors_origins =
			value.split(',').map(|origin| origin.trim().to_string()).collect();
	}
	if let Some(value) = env_non_empty("PLANFORGE_PG_DSN") {
		cfg.storage.postgres.dsn = value;
	}
	if let Some(value) = env_non_empty("CLOUDINARY_CLOUD_NAME") {
		cfg.media.cloud_name = value;
	}
	if let Some(value) = env_non_empty("CLOUDINARY_API_KEY") {
		cfg.media.api_key = value;
	}
	if let Some(value) = env_non_empty("CLOUDINARY_API_SECRET") {
		cfg.media.api_secret = value;
	}
	if let Some(value) = env_non_empty("OPENAI_API_KEY") {
		cfg.providers.openai.api_key = value;
	}
	if let Some(value) = env_non_empty("ANTHROPIC_API_KEY") {
		cfg.providers.anthropic.api_key = value;
	}
}

fn env_non_empty(key: &str) -> Option<String> {
	env::var(key).ok().filter(|value| !value.trim().is_empty())
}
