//! Unverified JSON Web Token payload decoding.
//!
//! The decoder never checks the token signature. Decoded claims are only suitable as
//! display or grouping values, such as the tenant label recorded in the credential
//! cache; they must not feed authorization decisions.

// std
use std::borrow::Cow;
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Errors raised while decoding a JWT payload segment.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Token does not contain a payload segment (fewer than two `.`-separated parts).
	#[error("Token has no payload segment.")]
	MissingPayload,
	/// Payload segment is not valid base64url data.
	#[error("Payload segment is not valid base64url data.")]
	Base64(#[from] base64::DecodeError),
	/// Payload bytes are not valid JSON.
	#[error("Payload bytes are not valid JSON.")]
	Json(#[from] serde_json::Error),
	/// Payload parsed as JSON but is not an object.
	#[error("Payload is valid JSON but not an object.")]
	NotAnObject,
}

/// Claim map decoded from a JWT payload segment.
#[derive(Clone, Debug)]
pub struct JwtPayload(Map<String, Value>);
impl JwtPayload {
	/// Looks up a claim by name.
	pub fn claim(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// Looks up a claim and narrows it to a string value.
	///
	/// Returns `None` for absent claims and for claims holding non-string values;
	/// callers apply their own default at the use site.
	pub fn claim_str(&self, name: &str) -> Option<&str> {
		self.claim(name).and_then(Value::as_str)
	}
}

/// Decodes the payload segment of `token` without verifying the signature.
pub fn decode_payload(token: &str) -> Result<JwtPayload, DecodeError> {
	let segment = token.split('.').nth(1).ok_or(DecodeError::MissingPayload)?;
	let bytes = URL_SAFE.decode(pad_segment(segment).as_bytes())?;

	match serde_json::from_slice::<Value>(&bytes)? {
		Value::Object(map) => Ok(JwtPayload(map)),
		_ => Err(DecodeError::NotAnObject),
	}
}

/// Restores the `=` padding JWT producers strip from base64url segments.
///
/// Pads only up to the next multiple of 4, so already-padded input passes through
/// unchanged.
fn pad_segment(segment: &str) -> Cow<'_, str> {
	match segment.len() % 4 {
		0 => Cow::Borrowed(segment),
		rem => {
			let mut padded = String::with_capacity(segment.len() + (4 - rem));

			padded.push_str(segment);
			padded.push_str(&"=".repeat(4 - rem));

			Cow::Owned(padded)
		},
	}
}
