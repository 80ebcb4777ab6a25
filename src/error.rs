//! Error types shared across the exchange, decode, and persist stages.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential cache persistence failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint answered with a non-200 status.
	#[error("Token endpoint rejected the exchange (HTTP {status}): {body}")]
	Exchange {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body text, preserved verbatim for diagnostics.
		body: String,
	},
	/// Token endpoint answered 200 with a body that does not parse into a token response.
	///
	/// Covers malformed JSON as well as a response missing one of the required fields;
	/// the source names the offending field path.
	#[error("Token endpoint returned a malformed token response.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Token endpoint cannot be derived from the authority and tenant.
	#[error("Token endpoint could not be derived for tenant `{tenant}`.")]
	InvalidTokenEndpoint {
		/// Tenant segment that produced the failure.
		tenant: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::cache::CacheError;

	#[test]
	fn cache_error_converts_with_source() {
		let cache_error = CacheError::Backend { message: "disk full".into() };
		let error: Error = cache_error.clone().into();

		assert!(matches!(error, Error::Cache(_)));
		assert!(error.to_string().contains("disk full"));

		let source = StdError::source(&error)
			.expect("Top-level error should expose the cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn exchange_error_keeps_the_body_text() {
		let error = Error::Exchange { status: 400, body: "{\"error\":\"invalid_grant\"}".into() };

		assert!(error.to_string().contains("HTTP 400"));
		assert!(error.to_string().contains("{\"error\":\"invalid_grant\"}"));
	}
}
