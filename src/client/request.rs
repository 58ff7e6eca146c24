//! Authenticated resource calls.
//!
//! A call first makes sure the handle holds an unexpired token (refreshing it at most once),
//! then sends the request with the bearer credential and classifies the response. The resource
//! call is never retried.

// crates.io
use oauth2::http::{
	Request,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{TokenHandle, TokenSecret},
	client::{ApiResponse, SpidClient},
	error::{ConfigError, TransportError},
	http::{HttpRequest, Method, ResponseKind, SpidHttpClient},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json";

impl<C> SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Calls `{base_url}/api/{api_version}{path}` with the handle's token.
	///
	/// An expired token is refreshed and published into `handle` before the call; if the refresh
	/// fails the resource is not contacted. `POST`, `PUT`, and `PATCH` send `params` as a form
	/// body; every other method appends them to the query string.
	pub async fn request(
		&self,
		method: Method,
		handle: &TokenHandle,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<ApiResponse> {
		const KIND: FlowKind = FlowKind::ApiRequest;

		let span = FlowSpan::new(KIND, "request");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let token = self.ensure_fresh(handle).await?;
				let request = self.prepare(method, token.access_token(), path, params)?;
				let response = self
					.http_client
					.execute(request, ResponseKind::Resource)
					.await
					.map_err(TransportError::network)?;

				ApiResponse::from_http(response, &self.config.sign_secret)
			})
			.await;

		obs::record_result(KIND, &result);

		result
	}

	/// Sends a `GET` request with `params` in the query string.
	pub async fn get(
		&self,
		handle: &TokenHandle,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<ApiResponse> {
		self.request(Method::GET, handle, path, params).await
	}

	/// Sends a `POST` request with `params` as a form body.
	pub async fn post(
		&self,
		handle: &TokenHandle,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<ApiResponse> {
		self.request(Method::POST, handle, path, params).await
	}

	/// Sends a `PUT` request with `params` as a form body.
	pub async fn put(
		&self,
		handle: &TokenHandle,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<ApiResponse> {
		self.request(Method::PUT, handle, path, params).await
	}

	/// Sends a `DELETE` request with `params` in the query string.
	pub async fn delete(
		&self,
		handle: &TokenHandle,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<ApiResponse> {
		self.request(Method::DELETE, handle, path, params).await
	}

	fn prepare(
		&self,
		method: Method,
		access_token: &TokenSecret,
		path: &str,
		params: &[(&str, &str)],
	) -> Result<HttpRequest> {
		let mut uri = self.config.api_endpoint(path);
		let encoded = Serializer::new(String::new()).extend_pairs(params).finish();
		let carries_body = matches!(method, Method::POST | Method::PUT | Method::PATCH);
		let mut builder = Request::builder()
			.header(AUTHORIZATION, access_token.bearer_header()?)
			.header(ACCEPT, JSON_CONTENT_TYPE);
		let body = if carries_body {
			builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE);

			encoded.into_bytes()
		} else {
			if !encoded.is_empty() {
				uri.push(if uri.contains('?') { '&' } else { '?' });
				uri.push_str(&encoded);
			}

			Vec::new()
		};

		builder.method(method).uri(uri).body(body).map_err(|e| ConfigError::from(e).into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::{build_static_test_client, mock_token},
		http::{FixedResponse, StaticHttpClient},
	};

	fn ok_client() -> (SpidClient<StaticHttpClient>, Arc<StaticHttpClient>) {
		build_static_test_client(StaticHttpClient::new(FixedResponse::json(200, "{}")))
	}

	#[tokio::test]
	async fn get_appends_query_and_bearer_header() {
		let (client, http_client) = ok_client();
		let handle = TokenHandle::new(mock_token());

		client
			.get(&handle, "/users", &[("email", "a b@spid.no"), ("limit", "10")])
			.await
			.expect("Resource call should succeed.");

		let request = &http_client.requests_of(ResponseKind::Resource)[0];

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.uri, "https://spiddomain.no/api/2/users?email=a+b%40spid.no&limit=10");
		assert_eq!(
			request.headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()),
			Some("Bearer accesstoken")
		);
		assert!(request.body.is_empty());
	}

	#[tokio::test]
	async fn post_sends_form_body() {
		let (client, http_client) = ok_client();
		let handle = TokenHandle::new(mock_token());

		client
			.post(&handle, "/user/1", &[("name", "Kari Nordmann")])
			.await
			.expect("Resource call should succeed.");

		let request = &http_client.requests()[0];

		assert_eq!(request.method, Method::POST);
		assert_eq!(request.uri, "https://spiddomain.no/api/2/user/1");
		assert_eq!(request.body, "name=Kari+Nordmann");
		assert_eq!(
			request.headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some(FORM_CONTENT_TYPE)
		);
	}

	#[tokio::test]
	async fn delete_without_params_has_no_query() {
		let (client, http_client) = ok_client();
		let handle = TokenHandle::new(mock_token());

		client.delete(&handle, "/user/1", &[]).await.expect("Resource call should succeed.");

		assert_eq!(http_client.requests()[0].uri, "https://spiddomain.no/api/2/user/1");
		assert_eq!(http_client.requests()[0].method, Method::DELETE);
	}

	#[tokio::test]
	async fn resource_transport_failure_is_classified() {
		let (client, _) = build_static_test_client(StaticHttpClient::default());
		let handle = TokenHandle::new(mock_token());
		let err = client.get(&handle, "/me", &[]).await.expect_err("Transport should fail.");

		assert!(matches!(err, Error::Transport(_)));
	}
}
