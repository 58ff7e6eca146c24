//! Construction-time configuration for [`SpidClient`](crate::client::SpidClient).
//!
//! The configuration is plain data; [`SpidConfigBuilder`] validates it and normalizes the base
//! URL so endpoint strings can be composed by concatenation. The provider URL is kept as text
//! because authorization and logout URLs are compared literally.

/// Builder API for assembling configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2";

/// Client credentials and provider location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpidConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Shared secret used to verify signed responses.
	pub sign_secret: TokenSecret,
	/// Redirect URI registered for the authorization code flow.
	pub redirect_uri: String,
	/// Provider base URL without a trailing slash.
	pub base_url: String,
	/// API version segment inserted into resource URLs.
	pub api_version: String,
}
impl SpidConfig {
	/// Creates a new builder from the required values.
	pub fn builder(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		sign_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
		base_url: impl Into<String>,
	) -> SpidConfigBuilder {
		SpidConfigBuilder::new(client_id, client_secret, sign_secret, redirect_uri, base_url)
	}

	/// Returns `{base_url}{path}`.
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}{path}", self.base_url)
	}

	/// Token endpoint used for every grant.
	pub fn token_endpoint(&self) -> String {
		self.endpoint("/oauth/token")
	}

	/// Resource URL for an API path such as `/me`.
	pub fn api_endpoint(&self, path: &str) -> String {
		let separator = if path.starts_with('/') { "" } else { "/" };

		format!("{}/api/{}{separator}{path}", self.base_url, self.api_version)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn endpoints_compose_from_base_url() {
		let config =
			SpidConfig::builder("id", "secret", "sign", "https://app/cb", "https://spid.no/")
				.build()
				.expect("Configuration fixture should be valid.");

		assert_eq!(config.base_url, "https://spid.no");
		assert_eq!(config.token_endpoint(), "https://spid.no/oauth/token");
		assert_eq!(config.api_endpoint("/me"), "https://spid.no/api/2/me");
		assert_eq!(config.api_endpoint("user/1"), "https://spid.no/api/2/user/1");
	}
}
