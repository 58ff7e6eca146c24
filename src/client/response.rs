//! Resource response classification and the value handed back to callers.

// crates.io
use oauth2::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ApiError, OAuthError, OAuthOrigin},
	http::HttpResponse,
	obs,
	provider::ProviderError,
	signed,
};

/// Successful resource response.
///
/// `raw_data` holds the body verbatim, or the verified plaintext when the provider answered
/// with a signed envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	status: u16,
	content_type: Option<String>,
	raw_data: String,
}
impl ApiResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, content_type: Option<String>, raw_data: impl Into<String>) -> Self {
		Self { status, content_type, raw_data: raw_data.into() }
	}

	/// Returns the HTTP status code.
	pub fn status(&self) -> u16 {
		self.status
	}

	/// Returns the `Content-Type` header value, when present.
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Returns the body, or the envelope plaintext for signed responses.
	pub fn raw_data(&self) -> &str {
		&self.raw_data
	}

	/// Consumes the response and returns its body.
	pub fn into_raw_data(self) -> String {
		self.raw_data
	}

	/// Deserializes the body as JSON.
	pub fn json<T>(&self) -> Result<T, serde_json::Error>
	where
		T: DeserializeOwned,
	{
		serde_json::from_str(&self.raw_data)
	}

	/// Returns the `data` member of SPID's response container, if the body has one.
	pub fn data(&self) -> Option<serde_json::Value> {
		match self.json::<serde_json::Value>() {
			Ok(serde_json::Value::Object(mut container)) => container.remove("data"),
			_ => None,
		}
	}

	/// Classifies a raw resource response, unwrapping signed envelopes with `sign_secret`.
	pub(crate) fn from_http(response: HttpResponse, sign_secret: &TokenSecret) -> Result<Self> {
		let (parts, bytes) = response.into_parts();
		let status = parts.status.as_u16();
		let content_type = parts
			.headers
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);

		if !parts.status.is_success() {
			let body = String::from_utf8_lossy(&bytes).into_owned();

			return Err(match ProviderError::parse(&body) {
				Some(error) => OAuthError::Rejected {
					origin: OAuthOrigin::Resource,
					status,
					error: Box::new(error),
					body,
				}
				.into(),
				None => ApiError::from_bytes(status, bytes).into(),
			});
		}

		let body = String::from_utf8_lossy(&bytes).into_owned();
		let raw_data = if signed::is_signed_envelope(&body) {
			let opened = signed::unwrap(&body, sign_secret);

			obs::record_envelope_verification(&opened);

			opened?
		} else {
			body
		};

		Ok(Self { status, content_type, raw_data })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::TEST_SIGN_SECRET, signed::SignedEnvelope};

	fn http_response(status: u16, body: &str) -> HttpResponse {
		oauth2::http::Response::builder()
			.status(status)
			.header(CONTENT_TYPE, "application/json")
			.body(body.as_bytes().to_vec())
			.expect("Response fixture should build.")
	}

	fn secret() -> TokenSecret {
		TokenSecret::new(TEST_SIGN_SECRET)
	}

	#[test]
	fn plain_body_passes_through_unchanged() {
		let body = "{\"name\":\"SPP Container\",\"data\":{\"userId\":\"1\"}}";
		let response = ApiResponse::from_http(http_response(200, body), &secret())
			.expect("Plain response should classify.");

		assert_eq!(response.status(), 200);
		assert_eq!(response.content_type(), Some("application/json"));
		assert_eq!(response.raw_data(), body);
		assert_eq!(response.data(), Some(serde_json::json!({ "userId": "1" })));
	}

	#[test]
	fn signed_body_is_unwrapped() {
		let envelope =
			SignedEnvelope::seal("SPP Container", "0.2", b"{\"userId\":\"1\"}", &secret());
		let body = serde_json::to_string(&envelope).expect("Envelope should serialize.");
		let response = ApiResponse::from_http(http_response(200, &body), &secret())
			.expect("Signed response should unwrap.");

		assert_eq!(response.raw_data(), "{\"userId\":\"1\"}");
	}

	#[test]
	fn forbidden_with_unknown_body_is_api_error() {
		let body = "{\"error\":{\"code\":403,\"type\":\"ApiException\",\"description\":\"nope\"}}";
		let err = ApiResponse::from_http(http_response(403, body), &secret())
			.expect_err("403 should fail.");

		match err {
			Error::Api(api) => {
				assert_eq!(api.message(), format!("403:{body}"));
				assert_eq!(api.response_code(), 403);
				assert_eq!(api.response_body(), body);
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn forbidden_with_oauth_body_is_oauth_error() {
		let body = "{\"error\":\"invalid_token\",\"error_code\":\"401\",\"type\":\"OAuthException\",\"error_description\":\"401 Unauthorized access!\"}";
		let err = ApiResponse::from_http(http_response(403, body), &secret())
			.expect_err("403 should fail.");

		assert!(matches!(
			err,
			Error::OAuth(OAuthError::Rejected { origin: OAuthOrigin::Resource, status: 403, .. })
		));
	}

	#[test]
	fn forbidden_with_binary_body_keeps_original_bytes() {
		let bytes = vec![0x34, 0x30, 0x33, 0xFF, 0xFE, 0x00];
		let response = oauth2::http::Response::builder()
			.status(403)
			.body(bytes.clone())
			.expect("Response fixture should build.");
		let err = ApiResponse::from_http(response, &secret()).expect_err("403 should fail.");

		match err {
			Error::Api(api) => {
				assert_eq!(api.response_bytes(), bytes.as_slice());
				assert_eq!(api.response_body(), "403\u{FFFD}\u{FFFD}\u{0}");
				assert_eq!(api.message(), "403:403\u{FFFD}\u{FFFD}\u{0}");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn non_json_body_has_no_data_member() {
		let response = ApiResponse::new(200, None, "plain text");

		assert_eq!(response.data(), None);
		assert!(response.json::<serde_json::Value>().is_err());
	}
}
