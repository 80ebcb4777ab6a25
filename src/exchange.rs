//! Authorization-code token exchange against an Entra ID token endpoint.

// crates.io
use reqwest::{StatusCode, header};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
	token::TokenResponse,
};

/// Default authority host for token requests.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
/// Default public client identifier presented during the exchange.
///
/// The well-known Azure AD PowerShell client, matching what the downstream consumer
/// tool authenticates as by default.
pub const DEFAULT_CLIENT_ID: &str = "1b730954-1685-4b74-9bfd-dac224a7b894";
/// Native-client callback URL registered for the default client.
pub const DEFAULT_REDIRECT_URI: &str =
	"https://login.microsoftonline.com/common/oauth2/nativeclient";
/// Scope string requested with every exchange.
pub const DEFAULT_SCOPE: &str =
	"https://graph.windows.net/.default offline_access openid profile";
/// Edge browser signature sent when no custom agent is configured.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/131.0.2903.86";

/// Performs the single authorization-code-for-token POST.
///
/// The exchanger owns its transport plus every request parameter (authority, client
/// id, redirect URI, scope, user agent) as explicit state, so nothing about the
/// outbound call is ambient. One [`exchange_code`](Self::exchange_code) call issues
/// exactly one request and mutates no local state.
#[derive(Clone, Debug)]
pub struct TokenExchanger {
	http_client: ReqwestClient,
	authority: Url,
	client_id: String,
	redirect_uri: Url,
	scope: String,
	user_agent: String,
}
impl TokenExchanger {
	/// Creates an exchanger targeting the provided authority.
	///
	/// Pass [`DEFAULT_AUTHORITY`] for the public cloud; tests and sovereign clouds
	/// supply their own base URL.
	pub fn new(authority: Url, client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self {
			http_client: ReqwestClient::default(),
			authority,
			client_id: client_id.into(),
			redirect_uri,
			scope: DEFAULT_SCOPE.into(),
			user_agent: DEFAULT_USER_AGENT.into(),
		}
	}

	/// Replaces the transport with a caller-configured client.
	pub fn with_http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = client;

		self
	}

	/// Overrides the User-Agent header presented to the token endpoint.
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();

		self
	}

	/// Overrides the scope string requested during the exchange.
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Derives the token endpoint for a tenant id or an alias such as `organizations`.
	pub fn token_endpoint(&self, tenant: &str) -> Result<Url> {
		self.authority.join(&format!("{tenant}/oauth2/v2.0/token")).map_err(|e| {
			ConfigError::InvalidTokenEndpoint { tenant: tenant.into(), source: e }.into()
		})
	}

	/// Redeems an authorization code against the tenant's token endpoint.
	///
	/// Exactly one outbound request is made; there are no retries and no timeout
	/// beyond the transport default. Any non-200 answer surfaces as
	/// [`Error::Exchange`] with the response body preserved verbatim.
	pub async fn exchange_code(&self, code: &str, tenant: &str) -> Result<TokenResponse> {
		let endpoint = self.token_endpoint(tenant)?;

		tracing::info!(%endpoint, "Requesting access token.");

		let response = self
			.http_client
			.post(endpoint)
			.header(header::USER_AGENT, self.user_agent.as_str())
			.form(&self.request_form(code))
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.text().await.map_err(TransportError::from)?;

		tracing::debug!(status = status.as_u16(), "Token endpoint answered.");

		if status != StatusCode::OK {
			return Err(Error::Exchange { status: status.as_u16(), body });
		}

		let mut deserializer = serde_json::Deserializer::from_str(&body);
		let parsed = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|e| Error::ResponseParse { source: e })?;

		Ok(parsed)
	}

	fn request_form<'a>(&'a self, code: &'a str) -> [(&'static str, &'a str); 5] {
		[
			("client_id", self.client_id.as_str()),
			("grant_type", "authorization_code"),
			("scope", self.scope.as_str()),
			("code", code),
			("redirect_uri", self.redirect_uri.as_str()),
		]
	}
}
