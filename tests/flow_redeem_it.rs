// std
use std::{
	env, fs,
	path::{Path, PathBuf},
	process,
};
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use httpmock::prelude::*;
use time::{
	Duration, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
	macros::format_description,
};
use url::Url;
// self
use roadswap::{
	cache::{CredentialCache, ROADTOOLS_CLIENT_ID, StoredCredential, local_now},
	exchange::TokenExchanger,
	flow::{AuthCodeFlow, FALLBACK_TENANT},
};

const EXPIRES_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

fn temp_path(tag: &str) -> PathBuf {
	let unique = format!(
		"roadswap_flow_{tag}_{}_{}.json",
		process::id(),
		OffsetDateTime::now_utc().unix_timestamp_nanos(),
	);

	env::temp_dir().join(unique)
}

fn fake_id_token(payload: &str) -> String {
	let header = URL_SAFE_NO_PAD.encode("{\"alg\":\"none\",\"typ\":\"JWT\"}");

	format!("{header}.{}.fake-signature", URL_SAFE_NO_PAD.encode(payload))
}

fn build_flow(server: &MockServer, cache_path: &Path) -> AuthCodeFlow {
	let authority =
		Url::parse(&server.base_url()).expect("Mock authority should parse successfully.");
	let redirect_uri = Url::parse("https://app.example.com/callback")
		.expect("Redirect URI should parse successfully.");
	let exchanger = TokenExchanger::new(authority, "client-flow-it", redirect_uri);

	AuthCodeFlow::new(exchanger, CredentialCache::new(cache_path))
}

fn naive(instant: OffsetDateTime) -> PrimitiveDateTime {
	PrimitiveDateTime::new(instant.date(), instant.time())
}

#[tokio::test]
async fn redeem_writes_the_roadtools_cache() {
	let server = MockServer::start_async().await;
	let cache_path = temp_path("success");
	let flow = build_flow(&server, &cache_path);
	let id_token = fake_id_token("{\"tid\":\"t1\",\"oid\":\"user-1\"}");
	let body = format!(
		"{{\"token_type\":\"Bearer\",\"expires_in\":3600,\"access_token\":\"AT1\",\"refresh_token\":\"RT1\",\"id_token\":\"{id_token}\"}}",
	);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/t-org/oauth2/v2.0/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(body.as_str());
		})
		.await;
	let before = local_now();
	let credential = flow
		.redeem("valid-code", "t-org")
		.await
		.expect("End-to-end redemption should succeed.");

	mock.assert_async().await;

	assert_eq!(credential.token_type, "Bearer");
	assert_eq!(credential.tenant_id, "t1");
	assert_eq!(credential.access_token, "AT1");
	assert_eq!(credential.refresh_token, "RT1");
	assert_eq!(credential.id_token, id_token, "idToken must match the response byte for byte.");
	assert_eq!(credential.client_id, ROADTOOLS_CLIENT_ID);

	let raw = fs::read_to_string(&cache_path).expect("Cache file should exist after redemption.");
	let reloaded: StoredCredential =
		serde_json::from_str(&raw).expect("Cache file should parse back.");

	assert_eq!(reloaded, credential);
	assert!(raw.contains("\n    \"tokenType\""), "Cache must be indented with 4 spaces.");

	let parsed = PrimitiveDateTime::parse(&credential.expires_on, EXPIRES_FORMAT)
		.expect("expiresOn should parse in the fixed format.");
	let expected = naive(before) + Duration::hours(1);

	assert!(
		(parsed - expected).abs() <= Duration::seconds(5),
		"expiresOn should land one hour after the redemption, got {parsed}.",
	);

	fs::remove_file(&cache_path).expect("Temporary cache file should be removable.");
}

#[tokio::test]
async fn redeem_reports_exchange_failures_and_writes_nothing() {
	let server = MockServer::start_async().await;
	let cache_path = temp_path("failure");
	let flow = build_flow(&server, &cache_path);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/t-err/oauth2/v2.0/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_grant\"}");
		})
		.await;
	let err = flow
		.redeem("stale-code", "t-err")
		.await
		.expect_err("A rejected exchange must fail the run.");

	mock.assert_async().await;

	assert!(
		err.to_string().contains("{\"error\":\"invalid_grant\"}"),
		"The provider's response body must be reported verbatim, got: {err}.",
	);
	assert!(!cache_path.exists(), "No cache file may be written on exchange failure.");
}

#[tokio::test]
async fn redeem_falls_back_when_the_id_token_is_opaque() {
	let server = MockServer::start_async().await;
	let cache_path = temp_path("fallback");
	let flow = build_flow(&server, &cache_path);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/t-opaque/oauth2/v2.0/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"token_type\":\"Bearer\",\"expires_in\":3600,\"access_token\":\"AT1\",\"refresh_token\":\"RT1\",\"id_token\":\"not-a-jwt\"}",
				);
		})
		.await;
	let credential = flow
		.redeem("valid-code", "t-opaque")
		.await
		.expect("An undecodable id_token must not abort the run.");

	mock.assert_async().await;

	assert_eq!(credential.tenant_id, FALLBACK_TENANT);
	assert_eq!(credential.id_token, "not-a-jwt");
	assert!(cache_path.exists(), "Cache file should be written despite the decode failure.");

	fs::remove_file(&cache_path).expect("Temporary cache file should be removable.");
}
