//! Fixed-response transport for tests and offline embedding.
//!
//! [`StaticHttpClient`] answers every request with a preconfigured [`FixedResponse`], optionally
//! choosing a different one per [`ResponseKind`], and records each request it receives.

// crates.io
use oauth2::http::{
	HeaderMap, HeaderValue, Method, StatusCode,
	header::{CONTENT_TYPE, InvalidHeaderValue},
	status::InvalidStatusCode,
};
// self
use crate::{
	_prelude::*,
	http::{HttpFuture, HttpRequest, HttpResponse, ResponseKind, SpidHttpClient},
};

/// Canned response returned by [`StaticHttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedResponse {
	/// HTTP status code.
	pub status: u16,
	/// `Content-Type` header value.
	pub content_type: String,
	/// Response body.
	pub body: String,
}
impl FixedResponse {
	/// Creates a response with an explicit content type.
	pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<String>) -> Self {
		Self { status, content_type: content_type.into(), body: body.into() }
	}

	/// Creates an `application/json` response.
	pub fn json(status: u16, body: impl Into<String>) -> Self {
		Self::new(status, "application/json", body)
	}

	fn to_http(&self) -> Result<HttpResponse, StaticTransportError> {
		let mut response = HttpResponse::new(self.body.clone().into_bytes());

		*response.status_mut() = StatusCode::from_u16(self.status)?;
		response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_str(&self.content_type)?);

		Ok(response)
	}
}

/// Request observed by [`StaticHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	/// Response kind the caller expected.
	pub kind: ResponseKind,
	/// HTTP method.
	pub method: Method,
	/// Full request URI.
	pub uri: String,
	/// Request headers.
	pub headers: HeaderMap,
	/// Request body decoded as UTF-8 (lossy).
	pub body: String,
}

/// Failures raised by [`StaticHttpClient`].
#[derive(Debug, ThisError)]
pub enum StaticTransportError {
	/// No response was configured for the requested kind.
	#[error("No fixed response is configured for {} requests.", .kind.as_str())]
	Unconfigured {
		/// Response kind that had no configured response.
		kind: ResponseKind,
	},
	/// Configured status code is outside the valid HTTP range.
	#[error(transparent)]
	InvalidStatus(#[from] InvalidStatusCode),
	/// Configured content type is not a valid header value.
	#[error(transparent)]
	InvalidHeader(#[from] InvalidHeaderValue),
}

/// Transport that serves fixed responses and records every request.
///
/// A response registered for a specific [`ResponseKind`] wins over the fallback response, which
/// mirrors a transport that answers the token endpoint differently from resources. Requests for
/// a kind with no response fail with [`StaticTransportError::Unconfigured`], which doubles as a
/// way to simulate transport failures.
#[derive(Debug, Default)]
pub struct StaticHttpClient {
	fallback: Option<FixedResponse>,
	by_kind: HashMap<ResponseKind, FixedResponse>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl StaticHttpClient {
	/// Serves `response` for every request.
	pub fn new(response: FixedResponse) -> Self {
		Self { fallback: Some(response), ..Default::default() }
	}

	/// Serves `response` for requests of the given kind.
	pub fn with_response(mut self, kind: ResponseKind, response: FixedResponse) -> Self {
		self.by_kind.insert(kind, response);

		self
	}

	/// Returns every request received so far, in order.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().clone()
	}

	/// Returns the requests received for the given kind, in order.
	pub fn requests_of(&self, kind: ResponseKind) -> Vec<RecordedRequest> {
		self.requests.lock().iter().filter(|request| request.kind == kind).cloned().collect()
	}

	fn respond(
		&self,
		request: HttpRequest,
		kind: ResponseKind,
	) -> Result<HttpResponse, StaticTransportError> {
		self.requests.lock().push(RecordedRequest {
			kind,
			method: request.method().clone(),
			uri: request.uri().to_string(),
			headers: request.headers().clone(),
			body: String::from_utf8_lossy(request.body()).into_owned(),
		});

		self.by_kind
			.get(&kind)
			.or(self.fallback.as_ref())
			.ok_or(StaticTransportError::Unconfigured { kind })?
			.to_http()
	}
}
impl SpidHttpClient for StaticHttpClient {
	type TransportError = StaticTransportError;

	fn execute(
		&self,
		request: HttpRequest,
		kind: ResponseKind,
	) -> HttpFuture<'_, Self::TransportError> {
		let result = self.respond(request, kind);

		Box::pin(async move { result })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request(uri: &str) -> HttpRequest {
		oauth2::http::Request::builder()
			.method(Method::GET)
			.uri(uri)
			.body(Vec::new())
			.expect("Request fixture should build.")
	}

	#[tokio::test]
	async fn kind_specific_response_wins_over_fallback() {
		let client =
			StaticHttpClient::new(FixedResponse::json(200, "{\"VALUE\":\"NOT IMPORTANT\"}"))
				.with_response(
					ResponseKind::Token,
					FixedResponse::json(201, "{\"access_token\":\"A\"}"),
				);
		let token = client
			.execute(request("https://spid.no/oauth/token"), ResponseKind::Token)
			.await
			.expect("Token response should be served.");
		let resource = client
			.execute(request("https://spid.no/api/2/me"), ResponseKind::Resource)
			.await
			.expect("Fallback response should be served.");

		assert_eq!(token.status().as_u16(), 201);
		assert_eq!(resource.status().as_u16(), 200);
		assert_eq!(resource.body(), b"{\"VALUE\":\"NOT IMPORTANT\"}");
		assert_eq!(
			resource.headers().get(CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/json")
		);
		assert_eq!(client.requests().len(), 2);
		assert_eq!(client.requests_of(ResponseKind::Token)[0].uri, "https://spid.no/oauth/token");
	}

	#[tokio::test]
	async fn unconfigured_kind_fails_like_a_transport_error() {
		let client = StaticHttpClient::default()
			.with_response(ResponseKind::Token, FixedResponse::json(200, "{}"));
		let err = client
			.execute(request("https://spid.no/api/2/me"), ResponseKind::Resource)
			.await
			.expect_err("Resource calls without a response should fail.");

		assert!(matches!(err, StaticTransportError::Unconfigured { kind: ResponseKind::Resource }));
		assert_eq!(client.requests_of(ResponseKind::Resource).len(), 1);
	}
}
