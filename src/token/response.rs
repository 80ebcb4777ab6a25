//! Token endpoint response model.

// self
use crate::{_prelude::*, token::TokenSecret};

/// Successful token endpoint payload for the authorization code grant.
///
/// Every field is required. Entra returns the full set for this grant, and a response
/// missing one of them is rejected while parsing (the failure names the field) instead
/// of surfacing later as an absent value.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Token scheme, `Bearer` in practice.
	pub token_type: String,
	/// Lifetime of the access token in seconds.
	pub expires_in: u64,
	/// Bearer token presented to resource APIs.
	pub access_token: TokenSecret,
	/// Long-lived secret used to obtain new access tokens later.
	pub refresh_token: TokenSecret,
	/// OpenID Connect identity token; its payload carries the `tid` claim.
	pub id_token: TokenSecret,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn deserializes_a_complete_payload() {
		let response: TokenResponse = serde_json::from_str(
			"{\"token_type\":\"Bearer\",\"expires_in\":3600,\"access_token\":\"AT\",\
			\"refresh_token\":\"RT\",\"id_token\":\"IT\",\"scope\":\"ignored extras\"}",
		)
		.expect("Complete payload should deserialize.");

		assert_eq!(response.token_type, "Bearer");
		assert_eq!(response.expires_in, 3600);
		assert_eq!(response.access_token.expose(), "AT");
		assert_eq!(response.refresh_token.expose(), "RT");
		assert_eq!(response.id_token.expose(), "IT");
	}

	#[test]
	fn rejects_a_payload_missing_a_required_field() {
		let result = serde_json::from_str::<TokenResponse>(
			"{\"token_type\":\"Bearer\",\"expires_in\":3600,\"access_token\":\"AT\"}",
		);

		assert!(result.is_err(), "Missing refresh_token/id_token must fail to parse.");
	}

	#[test]
	fn debug_rendering_redacts_every_secret() {
		let response: TokenResponse = serde_json::from_str(
			"{\"token_type\":\"Bearer\",\"expires_in\":60,\"access_token\":\"AT\",\
			\"refresh_token\":\"RT\",\"id_token\":\"IT\"}",
		)
		.expect("Payload fixture should deserialize.");
		let rendered = format!("{response:?}");

		assert!(!rendered.contains("AT"));
		assert!(!rendered.contains("RT"));
		assert!(!rendered.contains("IT"));
		assert!(rendered.contains("<redacted>"));
	}
}
