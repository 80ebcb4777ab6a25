//! ROADtools credential cache schema and writer.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use serde_json::ser::PrettyFormatter;
use time::{format_description::BorrowedFormatItem, macros::format_description};
// self
use crate::{_prelude::*, token::TokenResponse};

/// Relative path the consumer tool expects the credential cache at.
pub const DEFAULT_CACHE_FILE: &str = ".roadtools_auth";
/// Client identifier the consumer tool assumes when replaying the cache.
///
/// Distinct from the OAuth `client_id` used during the exchange; the file carries this
/// legacy constant regardless of how the tokens were obtained.
pub const ROADTOOLS_CLIENT_ID: &str = "1b730954-1685-4b74-9bfd-dac224a7b894";

const EXPIRES_ON_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Errors produced while persisting the credential cache.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CacheError {
	/// Credential serialization or timestamp formatting failed.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Filesystem-level failure while writing the cache file.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// On-disk schema consumed by ROADtools.
///
/// Field names follow the consumer's wire format, including the underscore-prefixed
/// legacy client id field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
	/// Token scheme copied from the response, `Bearer` in practice.
	pub token_type: String,
	/// Absolute local expiry timestamp, `YYYY-MM-DD HH:MM:SS`, no zone suffix.
	pub expires_on: String,
	/// Directory the tokens were issued for.
	pub tenant_id: String,
	/// Client identifier the consumer tool replays with.
	#[serde(rename = "_clientId")]
	pub client_id: String,
	/// Raw access token.
	pub access_token: String,
	/// Raw refresh token.
	pub refresh_token: String,
	/// Raw identity token, byte-identical to the response value.
	pub id_token: String,
}

/// Writes [`StoredCredential`] snapshots to a fixed path, fully replacing any prior
/// file. There is no merge and no locking; one run owns the file.
#[derive(Clone, Debug)]
pub struct CredentialCache {
	path: PathBuf,
	client_id: String,
}
impl CredentialCache {
	/// Creates a writer targeting the provided path.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), client_id: ROADTOOLS_CLIENT_ID.into() }
	}

	/// Overrides the client id recorded in the cache file.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = client_id.into();

		self
	}

	/// Path the cache will be written to.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Converts a token response and persists it, stamping expiry from the current
	/// wall clock.
	pub fn write(
		&self,
		response: &TokenResponse,
		tenant_id: &str,
	) -> Result<StoredCredential, CacheError> {
		self.write_at(response, tenant_id, local_now())
	}

	/// Converts a token response and persists it, stamping expiry relative to `now`.
	///
	/// The expiry is always `now + expires_in`; nothing is read from claims inside
	/// the tokens themselves.
	pub fn write_at(
		&self,
		response: &TokenResponse,
		tenant_id: &str,
		now: OffsetDateTime,
	) -> Result<StoredCredential, CacheError> {
		let credential = self.assemble(response, tenant_id, now)?;

		self.persist(&credential)?;

		Ok(credential)
	}

	fn assemble(
		&self,
		response: &TokenResponse,
		tenant_id: &str,
		now: OffsetDateTime,
	) -> Result<StoredCredential, CacheError> {
		let lifetime = Duration::seconds(i64::try_from(response.expires_in).unwrap_or(i64::MAX));
		let expires_at = now.checked_add(lifetime).ok_or_else(|| CacheError::Serialization {
			message: "The expires_in value exceeds the supported range.".into(),
		})?;
		let expires_on =
			expires_at.format(EXPIRES_ON_FORMAT).map_err(|e| CacheError::Serialization {
				message: format!("Failed to format expiry timestamp: {e}"),
			})?;

		Ok(StoredCredential {
			token_type: response.token_type.clone(),
			expires_on,
			tenant_id: tenant_id.into(),
			client_id: self.client_id.clone(),
			access_token: response.access_token.expose().into(),
			refresh_token: response.refresh_token.expose().into(),
			id_token: response.id_token.expose().into(),
		})
	}

	fn persist(&self, credential: &StoredCredential) -> Result<(), CacheError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized = to_indented_json(credential)?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| CacheError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| CacheError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| CacheError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| CacheError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), CacheError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| CacheError::Backend {
				message: format!("Failed to create cache directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}
}

/// Current wall-clock instant in the local offset.
///
/// Falls back to UTC when the local offset cannot be determined, which the time crate
/// refuses to do in multi-threaded processes on some platforms.
pub fn local_now() -> OffsetDateTime {
	OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Serializes with the 4-space indentation the consumer tool was written against.
fn to_indented_json(credential: &StoredCredential) -> Result<Vec<u8>, CacheError> {
	let formatter = PrettyFormatter::with_indent(b"    ");
	let mut buf = Vec::new();
	let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

	credential.serialize(&mut serializer).map_err(|e| CacheError::Serialization {
		message: format!("Failed to serialize credential cache: {e}"),
	})?;

	Ok(buf)
}
