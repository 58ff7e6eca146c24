//! Browser-facing URLs: authorization and logout.

// crates.io
use url::form_urlencoded;
// self
use crate::{auth::SpidToken, client::SpidClient, http::SpidHttpClient};

impl<C> SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Returns the URL that starts the authorization code flow for `redirect_uri`.
	pub fn authorization_url(&self, redirect_uri: &str) -> String {
		format!(
			"{}?response_type=code&redirect_uri={}&client_id={}",
			self.config.endpoint("/oauth/authorize"),
			encode(redirect_uri),
			self.config.client_id
		)
	}

	/// Returns the URL that ends the user's provider session and sends them to `redirect_uri`.
	pub fn logout_url(&self, token: &SpidToken, redirect_uri: &str) -> String {
		format!(
			"{}?redirect_uri={}&oauth_token={}",
			self.config.endpoint("/logout"),
			encode(redirect_uri),
			token.access_token().expose()
		)
	}
}

fn encode(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::mock_token, config::SpidConfig, http::StaticHttpClient};

	fn client() -> SpidClient<StaticHttpClient> {
		let config = SpidConfig::builder(
			"fooClient",
			"fooSecret",
			"fooSignSecret",
			"https://fooserver/redirect",
			"fooBaseUrl",
		)
		.build()
		.expect("Configuration fixture should be valid.");

		SpidClient::with_http_client(config, StaticHttpClient::default())
	}

	#[test]
	fn authorization_url_encodes_redirect() {
		assert_eq!(
			client().authorization_url("https://fooserver/login"),
			"fooBaseUrl/oauth/authorize?response_type=code&redirect_uri=https%3A%2F%2Ffooserver%2Flogin&client_id=fooClient"
		);
	}

	#[test]
	fn authorization_url_is_injective_in_redirect() {
		let client = client();

		assert_ne!(
			client.authorization_url("https://fooserver/login?a=1&b=2"),
			client.authorization_url("https://fooserver/login?a=1")
		);
		assert!(
			client
				.authorization_url("https://fooserver/login?a=1&b=2")
				.contains("redirect_uri=https%3A%2F%2Ffooserver%2Flogin%3Fa%3D1%26b%3D2&")
		);
	}

	#[test]
	fn logout_url_carries_access_token() {
		assert_eq!(
			client().logout_url(&mock_token(), "https://fooserver/logout"),
			"fooBaseUrl/logout?redirect_uri=https%3A%2F%2Ffooserver%2Flogout&oauth_token=accesstoken"
		);
	}
}
