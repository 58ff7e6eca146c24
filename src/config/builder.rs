// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{DEFAULT_API_VERSION, SpidConfig},
	error::ConfigError,
};

/// Builder for [`SpidConfig`] values.
#[derive(Debug)]
pub struct SpidConfigBuilder {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Shared secret used to verify signed responses.
	pub sign_secret: TokenSecret,
	/// Redirect URI registered for the authorization code flow.
	pub redirect_uri: String,
	/// Provider base URL.
	pub base_url: String,
	/// API version segment inserted into resource URLs.
	pub api_version: String,
}
impl SpidConfigBuilder {
	/// Creates a new builder seeded with the required values.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		sign_secret: impl Into<String>,
		redirect_uri: impl Into<String>,
		base_url: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			sign_secret: TokenSecret::new(sign_secret),
			redirect_uri: redirect_uri.into(),
			base_url: base_url.into(),
			api_version: DEFAULT_API_VERSION.into(),
		}
	}

	/// Overrides the API version segment (defaults to `2`).
	pub fn api_version(mut self, version: impl Into<String>) -> Self {
		self.api_version = version.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<SpidConfig, ConfigError> {
		let config = SpidConfig {
			client_id: self.client_id,
			client_secret: self.client_secret,
			sign_secret: self.sign_secret,
			redirect_uri: self.redirect_uri,
			base_url: self.base_url.trim_end_matches('/').to_owned(),
			api_version: self.api_version.trim_matches('/').to_owned(),
		};

		config.validate()?;

		Ok(config)
	}
}

impl SpidConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		require("client_id", &self.client_id)?;
		require_secret("client_secret", &self.client_secret)?;
		require_secret("sign_secret", &self.sign_secret)?;
		require("redirect_uri", &self.redirect_uri)?;
		require("base_url", &self.base_url)?;
		require("api_version", &self.api_version)?;

		Ok(())
	}
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
	if value.trim().is_empty() { Err(ConfigError::MissingValue { field }) } else { Ok(()) }
}

fn require_secret(field: &'static str, value: &TokenSecret) -> Result<(), ConfigError> {
	if value.is_blank() { Err(ConfigError::MissingValue { field }) } else { Ok(()) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_rejects_empty_values() {
		let err = SpidConfig::builder("", "secret", "sign", "https://app/cb", "https://spid.no")
			.build()
			.expect_err("Empty client identifier should be rejected.");

		assert!(matches!(err, ConfigError::MissingValue { field: "client_id" }));

		let err = SpidConfig::builder("id", "secret", " ", "https://app/cb", "https://spid.no")
			.build()
			.expect_err("Blank signing secret should be rejected.");

		assert!(matches!(err, ConfigError::MissingValue { field: "sign_secret" }));

		let err = SpidConfig::builder("id", "secret", "sign", "https://app/cb", "/")
			.build()
			.expect_err("Base URL made only of slashes should be rejected.");

		assert!(matches!(err, ConfigError::MissingValue { field: "base_url" }));
	}

	#[test]
	fn builder_accepts_opaque_base_urls() {
		let config =
			SpidConfig::builder("fooClient", "fooSecret", "fooSig", "https://fooserver", "fooBaseUrl")
				.api_version("/3/")
				.build()
				.expect("Opaque base URLs should be accepted.");

		assert_eq!(config.base_url, "fooBaseUrl");
		assert_eq!(config.api_version, "3");
		assert_eq!(config.client_secret.expose(), "fooSecret");
	}
}
