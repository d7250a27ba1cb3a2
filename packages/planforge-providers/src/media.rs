use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::{Client, multipart};
use serde_json::Value;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use planforge_config::Media;

#[derive(Clone, Debug)]
pub struct UploadOutcome {
	pub secure_url: String,
	pub thumbnail_url: Option<String>,
}

/// Signed upload with automatic resource-type detection (`/auto/upload`).
/// Returns the durable URL the host assigned, plus a thumbnail URL when the
/// host produced a distinct one.
pub async fn upload(
	cfg: &Media,
	folder: &str,
	filename: &str,
	bytes: Vec<u8>,
) -> Result<UploadOutcome> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/v1_1/{}/auto/upload", cfg.api_base, cfg.cloud_name);
	let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
	let signature =
		sign_request(&[("folder", folder), ("timestamp", &timestamp)], &cfg.api_secret);
	let form = multipart::Form::new()
		.text("api_key", cfg.api_key.clone())
		.text("folder", folder.to_string())
		.text("timestamp", timestamp)
		.text("signature", signature)
		.part("file", multipart::Part::bytes(bytes).file_name(filename.to_string()));
	let res = client.post(url).multipart(form).send().await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_upload_response(json)
}

/// Parameters are signed sorted by name, joined as `key=value` pairs with
/// `&`, with the API secret appended, then SHA-256 hex encoded.
fn sign_request(params: &[(&str, &str)], api_secret: &str) -> String {
	let mut sorted = params.to_vec();

	sorted.sort_by_key(|(key, _)| *key);

	let joined =
		sorted.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("&");
	let mut hasher = Sha256::new();

	hasher.update(joined.as_bytes());
	hasher.update(api_secret.as_bytes());

	hex::encode(hasher.finalize())
}

fn parse_upload_response(json: Value) -> Result<UploadOutcome> {
	let secure_url = json
		.get("secure_url")
		.and_then(|v| v.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Upload response is missing secure_url."))?;
	let thumbnail_url = json.get("thumbnail_url").and_then(|v| v.as_str()).map(str::to_string);

	Ok(UploadOutcome { secure_url, thumbnail_url })
}
