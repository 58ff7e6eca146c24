//! Token endpoint exchanges: client credentials, authorization code, and refresh token.
//!
//! [`TokenAcquirer`] prepares `application/x-www-form-urlencoded` requests against
//! `{base_url}/oauth/token`, hands them to the configured [`SpidHttpClient`] tagged as
//! [`ResponseKind::Token`], and maps the answer into a [`SpidToken`] or an [`OAuthError`]. It
//! keeps no state between calls and never retries; retry policy belongs to the caller.

pub use oauth2;

// crates.io
use oauth2::http::{
	Method, Request,
	header::{ACCEPT, CONTENT_TYPE},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{SpidToken, TokenSecret, TokenType},
	config::SpidConfig,
	error::{ConfigError, OAuthError, OAuthOrigin, TransportError},
	http::{HttpRequest, HttpResponse, ResponseKind, SpidHttpClient},
	provider::{GrantType, ProviderError},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Successful token endpoint body; unknown members (`scope`, `user_id`, ...) are ignored.
#[derive(Debug, Deserialize)]
struct TokenEndpointBody {
	access_token: String,
	expires_in: i64,
	#[serde(default)]
	refresh_token: Option<String>,
}

/// Performs grants against the provider's token endpoint.
pub struct TokenAcquirer<C>
where
	C: ?Sized + SpidHttpClient,
{
	config: Arc<SpidConfig>,
	http_client: Arc<C>,
}
impl<C> TokenAcquirer<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Creates an acquirer that sends requests through `http_client`.
	pub fn new(config: impl Into<Arc<SpidConfig>>, http_client: impl Into<Arc<C>>) -> Self {
		Self { config: config.into(), http_client: http_client.into() }
	}

	/// Performs the `client_credentials` grant and returns a [`TokenType::Client`] token.
	pub async fn client_credentials(&self) -> Result<SpidToken> {
		let grant = GrantType::ClientCredentials;
		let response = self.exchange(grant, &[]).await?;

		parse_token_response(grant, TokenType::Client, None, response)
	}

	/// Exchanges an authorization code and returns a [`TokenType::User`] token.
	pub async fn authorization_code(&self, code: &str, redirect_uri: &str) -> Result<SpidToken> {
		let grant = GrantType::AuthorizationCode;
		let response =
			self.exchange(grant, &[("code", code), ("redirect_uri", redirect_uri)]).await?;

		parse_token_response(grant, TokenType::User, None, response)
	}

	/// Renews `token`, returning a new token of the same type.
	///
	/// The previous refresh credential is carried over when the provider does not rotate it.
	/// Client tokens issued without a refresh credential are renewed through a new
	/// `client_credentials` grant; user tokens without one cannot be renewed.
	pub async fn refresh(&self, token: &SpidToken) -> Result<SpidToken> {
		let Some(refresh_token) = token.refresh_token() else {
			return match token.token_type() {
				TokenType::Client => self.client_credentials().await,
				TokenType::User => Err(OAuthError::MissingRefreshToken.into()),
			};
		};
		let grant = GrantType::RefreshToken;
		let response = self.exchange(grant, &[("refresh_token", refresh_token.expose())]).await?;

		parse_token_response(grant, token.token_type(), Some(refresh_token), response)
	}

	async fn exchange(&self, grant: GrantType, params: &[(&str, &str)]) -> Result<HttpResponse> {
		let request = self.prepare(grant, params)?;

		self.http_client
			.execute(request, ResponseKind::Token)
			.await
			.map_err(|e| OAuthError::Transport { grant, source: TransportError::network(e) }.into())
	}

	fn prepare(&self, grant: GrantType, params: &[(&str, &str)]) -> Result<HttpRequest> {
		let body = Serializer::new(String::new())
			.append_pair("grant_type", grant.as_str())
			.append_pair("client_id", &self.config.client_id)
			.append_pair("client_secret", self.config.client_secret.expose())
			.extend_pairs(params)
			.finish();

		Request::builder()
			.method(Method::POST)
			.uri(self.config.token_endpoint())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.body(body.into_bytes())
			.map_err(|e| ConfigError::from(e).into())
	}
}
impl<C> Clone for TokenAcquirer<C>
where
	C: ?Sized + SpidHttpClient,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), http_client: self.http_client.clone() }
	}
}
impl<C> Debug for TokenAcquirer<C>
where
	C: ?Sized + SpidHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenAcquirer")
			.field("token_endpoint", &self.config.token_endpoint())
			.field("client_id", &self.config.client_id)
			.finish()
	}
}

fn parse_token_response(
	grant: GrantType,
	token_type: TokenType,
	previous_refresh: Option<&TokenSecret>,
	response: HttpResponse,
) -> Result<SpidToken> {
	let status = response.status();
	let body = String::from_utf8_lossy(response.body()).into_owned();

	if let Some(error) = ProviderError::parse(&body) {
		return Err(OAuthError::Rejected {
			origin: OAuthOrigin::Grant(grant),
			status: status.as_u16(),
			error: Box::new(error),
			body,
		}
		.into());
	}
	if !status.is_success() {
		return Err(OAuthError::UnexpectedStatus { grant, status: status.as_u16(), body }.into());
	}

	let mut deserializer = serde_json::Deserializer::from_str(&body);
	let parsed: TokenEndpointBody = serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| OAuthError::MalformedResponse {
			grant,
			status: status.as_u16(),
			source,
		})?;
	let refresh_token = parsed
		.refresh_token
		.or_else(|| previous_refresh.map(|secret| secret.expose().to_owned()));

	let expires_in = parsed.expires_in;

	SpidToken::try_new(parsed.access_token, expires_in, refresh_token, token_type).map_err(|_| {
		OAuthError::ExpiresInOutOfRange { grant, status: status.as_u16(), expires_in }.into()
	})
}
