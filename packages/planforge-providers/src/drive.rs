use std::{fs, path::Path};

use color_eyre::{Result, eyre};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, multipart};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
struct ServiceCredentials {
	client_email: String,
	private_key: String,
	token_uri: String,
}

#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
	iss: &'a str,
	scope: &'a str,
	aud: &'a str,
	iat: i64,
	exp: i64,
}

/// Capability wrapper over one external storage account. A missing or
/// unreadable credential file leaves the capability disabled: operations
/// log a warning and return `None` instead of failing the caller.
pub struct DriveService {
	client: Client,
	credentials: Option<ServiceCredentials>,
}
impl DriveService {
	pub fn new(credentials_path: &Path) -> Self {
		let credentials = match load_credentials(credentials_path) {
			Ok(credentials) => {
				tracing::info!("Successfully loaded cloud storage credentials.");

				Some(credentials)
			},
			Err(err) => {
				tracing::warn!(
					path = %credentials_path.display(),
					%err,
					"Cloud storage credentials unavailable; folder operations disabled.",
				);

				None
			},
		};

		Self { client: Client::new(), credentials }
	}

	pub fn is_enabled(&self) -> bool {
		self.credentials.is_some()
	}

	/// Creates a folder and returns its id, or `None` on failure or when the
	/// capability is disabled.
	pub async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Option<String> {
		let Some(credentials) = self.credentials.as_ref() else {
			tracing::warn!("Drive service not initialized. Cannot create folder.");

			return None;
		};

		match self.create_folder_inner(credentials, name, parent_id).await {
			Ok(id) => {
				tracing::info!(folder = name, id = id.as_str(), "Created folder.");

				Some(id)
			},
			Err(err) => {
				tracing::error!(folder = name, %err, "Error creating folder.");

				None
			},
		}
	}

	/// Uploads a local file and returns its id, or `None` when the source
	/// path does not exist, the capability is disabled, or the call fails.
	pub async fn upload_file(
		&self,
		file_path: &Path,
		folder_id: Option<&str>,
		mime_type: Option<&str>,
	) -> Option<String> {
		let Some(credentials) = self.credentials.as_ref() else {
			tracing::warn!("Drive service not initialized. Cannot upload file.");

			return None;
		};

		if !file_path.exists() {
			tracing::error!(path = %file_path.display(), "File to upload not found.");

			return None;
		}

		match self.upload_file_inner(credentials, file_path, folder_id, mime_type).await {
			Ok(id) => {
				tracing::info!(path = %file_path.display(), id = id.as_str(), "Uploaded file.");

				Some(id)
			},
			Err(err) => {
				tracing::error!(path = %file_path.display(), %err, "Error uploading file.");

				None
			},
		}
	}

	/// Returns the id of the first matching, non-trashed folder, or `None`.
	pub async fn find_folder(&self, name: &str, parent_id: Option<&str>) -> Option<String> {
		let credentials = self.credentials.as_ref()?;

		match self.find_folder_inner(credentials, name, parent_id).await {
			Ok(id) => id,
			Err(err) => {
				tracing::error!(folder = name, %err, "Error finding folder.");

				None
			},
		}
	}

	async fn create_folder_inner(
		&self,
		credentials: &ServiceCredentials,
		name: &str,
		parent_id: Option<&str>,
	) -> Result<String> {
		let token = self.access_token(credentials).await?;
		let mut metadata = serde_json::json!({
			"name": name,
			"mimeType": FOLDER_MIME,
		});

		if let Some(parent_id) = parent_id {
			metadata["parents"] = serde_json::json!([parent_id]);
		}

		let res = self
			.client
			.post(format!("{DRIVE_FILES_URL}?fields=id"))
			.bearer_auth(token)
			.json(&metadata)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_file_id(json)
	}

	async fn upload_file_inner(
		&self,
		credentials: &ServiceCredentials,
		file_path: &Path,
		folder_id: Option<&str>,
		mime_type: Option<&str>,
	) -> Result<String> {
		let token = self.access_token(credentials).await?;
		let file_name = file_path
			.file_name()
			.and_then(|name| name.to_str())
			.ok_or_else(|| eyre::eyre!("Upload path has no usable file name."))?;
		let bytes = fs::read(file_path)?;
		let mut metadata = serde_json::json!({ "name": file_name });

		if let Some(folder_id) = folder_id {
			metadata["parents"] = serde_json::json!([folder_id]);
		}

		let metadata_part =
			multipart::Part::text(metadata.to_string()).mime_str("application/json")?;
		let mut media_part = multipart::Part::bytes(bytes).file_name(file_name.to_string());

		if let Some(mime_type) = mime_type {
			media_part = media_part.mime_str(mime_type)?;
		}

		let form =
			multipart::Form::new().part("metadata", metadata_part).part("media", media_part);
		let res = self
			.client
			.post(format!("{DRIVE_UPLOAD_URL}?uploadType=multipart&fields=id"))
			.bearer_auth(token)
			.multipart(form)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_file_id(json)
	}

	async fn find_folder_inner(
		&self,
		credentials: &ServiceCredentials,
		name: &str,
		parent_id: Option<&str>,
	) -> Result<Option<String>> {
		let token = self.access_token(credentials).await?;
		let query = folder_query(name, parent_id);
		let res = self
			.client
			.get(DRIVE_FILES_URL)
			.bearer_auth(token)
			.query(&[("q", query.as_str()), ("spaces", "drive"), ("fields", "files(id, name)")])
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		Ok(parse_first_folder_id(&json))
	}

	/// Service-account flow: a short-lived RS256 assertion exchanged for a
	/// bearer token on every call. No token caching.
	async fn access_token(&self, credentials: &ServiceCredentials) -> Result<String> {
		let now = OffsetDateTime::now_utc().unix_timestamp();
		let claims = TokenClaims {
			iss: &credentials.client_email,
			scope: DRIVE_SCOPE,
			aud: &credentials.token_uri,
			iat: now,
			exp: now + 3_600,
		};
		let assertion = jsonwebtoken::encode(
			&Header::new(Algorithm::RS256),
			&claims,
			&EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())?,
		)?;
		let res = self
			.client
			.post(&credentials.token_uri)
			.form(&[
				("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
				("assertion", assertion.as_str()),
			])
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		json.get("access_token")
			.and_then(|v| v.as_str())
			.map(str::to_string)
			.ok_or_else(|| eyre::eyre!("Token response is missing access_token."))
	}
}

fn load_credentials(path: &Path) -> Result<ServiceCredentials> {
	let raw = fs::read_to_string(path)?;
	let credentials = serde_json::from_str(&raw)?;

	Ok(credentials)
}

fn folder_query(name: &str, parent_id: Option<&str>) -> String {
	let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
	let mut query = format!("mimeType='{FOLDER_MIME}' and name='{escaped}' and trashed=false");

	if let Some(parent_id) = parent_id {
		query.push_str(&format!(" and '{parent_id}' in parents"));
	}

	query
}

fn parse_file_id(json: Value) -> Result<String> {
	json.get("id")
		.and_then(|v| v.as_str())
		.map(str::to_string)
		.ok_or_else(|| eyre::eyre!("Response is missing file id."))
}

fn parse_first_folder_id(json: &Value) -> Option<String> {
	json.get("files")
		.and_then(|v| v.as_array())
		.and_then(|files| files.first())
		.and_then(|file| file.get("id"))
		.and_then(|id| id.as_str())
		.map(str::to_string)
}
