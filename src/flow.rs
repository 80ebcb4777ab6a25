//! End-to-end redemption flow: exchange, claim extraction, cache write.

// self
use crate::{
	_prelude::*,
	cache::{CredentialCache, StoredCredential},
	exchange::TokenExchanger,
	jwt,
	obs::{Stage, StageSpan},
};

/// Tenant label recorded when the id_token payload cannot supply one.
pub const FALLBACK_TENANT: &str = "unknown-tenant";

/// Coordinates one authorization-code redemption from code to cache file.
///
/// The flow is strictly linear and stateless: one exchange, one decode, one write,
/// no retries and no session continuation. Running it twice performs two fully
/// independent redemptions against the same cache path.
#[derive(Clone, Debug)]
pub struct AuthCodeFlow {
	exchanger: TokenExchanger,
	cache: CredentialCache,
}
impl AuthCodeFlow {
	/// Creates a flow from its two halves.
	pub fn new(exchanger: TokenExchanger, cache: CredentialCache) -> Self {
		Self { exchanger, cache }
	}

	/// Redeems `code` against `tenant`'s token endpoint and persists the result.
	///
	/// A token response whose id_token cannot supply a `tid` claim still completes
	/// the run; the credential is recorded under [`FALLBACK_TENANT`] and a warning is
	/// emitted. Exchange failures abort before the cache file is touched.
	pub async fn redeem(&self, code: &str, tenant: &str) -> Result<StoredCredential> {
		let response = StageSpan::new(Stage::Exchange)
			.instrument(self.exchanger.exchange_code(code, tenant))
			.await?;
		let tenant_id = {
			let _guard = StageSpan::new(Stage::Decode).entered();

			resolve_tenant(response.id_token.expose())
		};
		let _guard = StageSpan::new(Stage::Persist).entered();
		let credential = self.cache.write(&response, &tenant_id)?;

		tracing::info!(
			path = %self.cache.path().display(),
			tenant = %credential.tenant_id,
			"Saved credential cache.",
		);

		Ok(credential)
	}
}

/// Extracts the `tid` claim from an id_token, degrading to the sentinel on failure.
///
/// The claim is read without signature verification and is only trusted as a grouping
/// label for the cache file, never for authorization.
fn resolve_tenant(id_token: &str) -> String {
	match jwt::decode_payload(id_token) {
		Ok(payload) => match payload.claim_str("tid") {
			Some(tid) => tid.to_owned(),
			None => {
				tracing::warn!("The id_token payload has no tid claim; recording {FALLBACK_TENANT}.");

				FALLBACK_TENANT.to_owned()
			},
		},
		Err(e) => {
			tracing::warn!(error = %e, "Failed to decode the id_token payload; recording {FALLBACK_TENANT}.");

			FALLBACK_TENANT.to_owned()
		},
	}
}
