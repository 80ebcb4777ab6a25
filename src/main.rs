//! Command-line entry point: parse flags, run the redemption flow, report the outcome.

// crates.io
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;
use url::Url;
// self
use roadswap::{
	cache::{CredentialCache, DEFAULT_CACHE_FILE},
	exchange::{
		DEFAULT_AUTHORITY, DEFAULT_CLIENT_ID, DEFAULT_REDIRECT_URI, DEFAULT_USER_AGENT,
		TokenExchanger,
	},
	flow::AuthCodeFlow,
};

/// Exchange a Microsoft Entra ID authorization code for tokens and save them in the
/// ROADtools credential cache format.
#[derive(Debug, Parser)]
#[command(name = "roadswap", version, about)]
struct Cli {
	/// Authorization code returned by the Microsoft login redirect.
	#[arg(short = 'c', long)]
	auth_code: String,
	/// Directory (tenant) identifier, or an alias such as `organizations`.
	#[arg(short = 't', long)]
	tenant_id: String,
	/// User-Agent header presented to the token endpoint.
	#[arg(short = 'u', long, default_value = DEFAULT_USER_AGENT)]
	user_agent: String,
	/// Redirect URI that was used during authorization.
	#[arg(short = 'r', long, default_value = DEFAULT_REDIRECT_URI)]
	redirect_uri: Url,
	/// OAuth client identifier presented to the token endpoint.
	#[arg(long, default_value = DEFAULT_CLIENT_ID)]
	client_id: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let cli = Cli::parse();
	let exchanger =
		TokenExchanger::new(Url::parse(DEFAULT_AUTHORITY)?, cli.client_id, cli.redirect_uri)
			.with_user_agent(cli.user_agent);
	let flow = AuthCodeFlow::new(exchanger, CredentialCache::new(DEFAULT_CACHE_FILE));
	let credential = flow.redeem(&cli.auth_code, &cli.tenant_id).await?;

	println!(
		"Authentication successful; tokens for tenant {} saved to {DEFAULT_CACHE_FILE}.",
		credential.tenant_id,
	);

	Ok(())
}
