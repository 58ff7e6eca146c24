//! OAuth 2.0 client for the SPID identity platform: server and user tokens, transparent refresh,
//! and verification of the provider's signed responses over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod signed;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{SpidToken, TokenType},
		client::SpidClient,
		config::SpidConfig,
		http::{FixedResponse, StaticHttpClient},
	};

	/// Client identifier used by the shared fixtures.
	pub const TEST_CLIENT_ID: &str = "ID";
	/// Client secret used by the shared fixtures.
	pub const TEST_CLIENT_SECRET: &str = "SECRET";
	/// Signing secret used by the shared fixtures.
	pub const TEST_SIGN_SECRET: &str = "SIGNSECRET";
	/// Token endpoint body returned by [`successful_token_response`].
	pub const SUCCESSFUL_TOKEN_RESPONSE: &str = "{\"access_token\":\"44005d748f89a86b6b1ad9d1ef833dc55e0d6244\",\"expires_in\":2419200,\"scope\":null,\"user_id\":false,\"is_admin\":false,\"refresh_token\":\"90bc261093c26bbdd0cab54a891f7e06298b7556\",\"server_time\":1398246344}";

	/// Builds the configuration shared by transport-backed tests.
	pub fn test_config() -> SpidConfig {
		SpidConfig::builder(
			TEST_CLIENT_ID,
			TEST_CLIENT_SECRET,
			TEST_SIGN_SECRET,
			"https://redirect.uri",
			"https://spiddomain.no",
		)
		.build()
		.expect("Test configuration should be valid.")
	}

	/// Fixed token endpoint response carrying [`SUCCESSFUL_TOKEN_RESPONSE`].
	pub fn successful_token_response() -> FixedResponse {
		FixedResponse::json(200, SUCCESSFUL_TOKEN_RESPONSE)
	}

	/// Constructs a [`SpidClient`] over the provided fixed-response transport.
	pub fn build_static_test_client(
		http_client: StaticHttpClient,
	) -> (SpidClient<StaticHttpClient>, Arc<StaticHttpClient>) {
		let http_client = Arc::new(http_client);
		let client = SpidClient::with_http_client(test_config(), http_client.clone());

		(client, http_client)
	}

	/// Token valid for an hour.
	pub fn mock_token() -> SpidToken {
		SpidToken::new("accesstoken", 3600, Some("refreshtoken".into()), TokenType::Client)
	}

	/// Token that expired a second before construction.
	pub fn expired_mock_token() -> SpidToken {
		SpidToken::new("accesstoken", -1, Some("refreshtoken".into()), TokenType::Client)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
