//! Redacted wrapper for access tokens, refresh tokens, and the client's shared secrets.

// crates.io
use oauth2::http::HeaderValue;
// self
use crate::{_prelude::*, error::ConfigError};

/// Credential that never shows up in `Debug` or `Display` output.
///
/// The same wrapper carries bearer tokens, refresh tokens, the client secret, and the signing
/// secret used to key envelope MACs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns the secret as key material, e.g. for an HMAC.
	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}

	/// Returns `true` when the secret is empty or whitespace only.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}

	/// Builds an `Authorization: Bearer` value flagged as sensitive, so HTTP stacks that honor
	/// the flag keep it out of their own logs.
	pub fn bearer_header(&self) -> Result<HeaderValue, ConfigError> {
		let mut value = HeaderValue::try_from(format!("Bearer {}", self.0))
			.map_err(|e| ConfigError::HttpRequest(e.into()))?;

		value.set_sensitive(true);

		Ok(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
