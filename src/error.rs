//! Client-level error types shared by the token acquirer, the envelope verifier, and the
//! request orchestrator.

// self
use crate::{
	_prelude::*,
	auth::TokenBuilderError,
	provider::{GrantType, ProviderError},
	signed::EnvelopeError,
};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// The enum is closed so callers can match every failure kind exhaustively.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Provider rejected a grant, refresh, or credential.
	#[error(transparent)]
	OAuth(#[from] OAuthError),
	/// Resource call returned a non-2xx status without an OAuth error payload.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Signed response carried a signature that does not match its payload.
	#[error("Signed response failed signature verification.")]
	SignatureMismatch,
	/// Signed response could not be processed.
	#[error(transparent)]
	Envelope(#[from] EnvelopeError),
	/// Transport failure (DNS, TCP, TLS) during a resource call.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Where an OAuth-layer rejection originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthOrigin {
	/// Token endpoint call for the given grant.
	Grant(GrantType),
	/// Authenticated resource call.
	Resource,
}
impl Display for OAuthOrigin {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Grant(grant) => write!(f, "{grant} grant"),
			Self::Resource => f.write_str("resource request"),
		}
	}
}

/// OAuth-layer failures: the provider refused a credential or answered a grant unusably.
#[derive(Debug, ThisError)]
pub enum OAuthError {
	/// Provider answered with an OAuth error payload.
	#[error("Provider rejected the {origin}: {error}.")]
	Rejected {
		/// Call that was rejected.
		origin: OAuthOrigin,
		/// HTTP status code of the rejection.
		status: u16,
		/// Parsed provider error payload.
		error: Box<ProviderError>,
		/// Raw response body, verbatim.
		body: String,
	},
	/// Token endpoint returned a non-2xx status without an OAuth error payload.
	#[error("Token endpoint returned HTTP {status} during the {grant} grant.")]
	UnexpectedStatus {
		/// Grant being exchanged.
		grant: GrantType,
		/// HTTP status code.
		status: u16,
		/// Raw response body, verbatim.
		body: String,
	},
	/// Token endpoint returned a success status with an unusable body.
	#[error("Token endpoint returned a malformed response during the {grant} grant.")]
	MalformedResponse {
		/// Grant being exchanged.
		grant: GrantType,
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint returned an `expires_in` that does not fit in the supported time range.
	#[error("Token endpoint returned expires_in {expires_in} during the {grant} grant.")]
	ExpiresInOutOfRange {
		/// Grant being exchanged.
		grant: GrantType,
		/// HTTP status code.
		status: u16,
		/// Lifetime in seconds as sent by the provider.
		expires_in: i64,
	},
	/// Token carries no refresh credential and cannot be renewed.
	#[error("Token cannot be refreshed because it carries no refresh token.")]
	MissingRefreshToken,
	/// Transport failed while calling the token endpoint.
	#[error("Transport failed during the {grant} grant.")]
	Transport {
		/// Grant being exchanged.
		grant: GrantType,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
}
impl OAuthError {
	/// Returns the provider error payload when the failure is a rejection.
	pub fn provider_error(&self) -> Option<&ProviderError> {
		match self {
			Self::Rejected { error, .. } => Some(&**error),
			_ => None,
		}
	}

	/// Returns the HTTP status code when one was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::UnexpectedStatus { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::ExpiresInOutOfRange { status, .. } => Some(*status),
			Self::MissingRefreshToken | Self::Transport { .. } => None,
		}
	}
}

/// Non-2xx resource response that is not an OAuth-layer failure.
///
/// The message is `"{status}:{body}"`. `body` is the response decoded as UTF-8, with invalid
/// sequences replaced by `U+FFFD`; [`ApiError::response_bytes`] returns the body exactly as the
/// server sent it.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{status}:{body}")]
pub struct ApiError {
	/// HTTP status code returned by the resource.
	pub status: u16,
	/// Response body decoded as UTF-8.
	pub body: String,
	bytes: Vec<u8>,
}
impl ApiError {
	/// Creates an error for the given status and textual body.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		let body = body.into();

		Self { status, bytes: body.clone().into_bytes(), body }
	}

	/// Creates an error for the given status and raw body bytes.
	pub fn from_bytes(status: u16, bytes: Vec<u8>) -> Self {
		Self { status, body: String::from_utf8_lossy(&bytes).into_owned(), bytes }
	}

	/// Returns the `"{status}:{body}"` message.
	pub fn message(&self) -> String {
		self.to_string()
	}

	/// Returns the HTTP status code.
	pub fn response_code(&self) -> u16 {
		self.status
	}

	/// Returns the response body decoded as UTF-8.
	pub fn response_body(&self) -> &str {
		&self.body
	}

	/// Returns the response body byte for byte.
	pub fn response_bytes(&self) -> &[u8] {
		&self.bytes
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required configuration value was empty.
	#[error("Configuration value `{field}` must not be empty.")]
	MissingValue {
		/// Name of the empty field.
		field: &'static str,
	},
	/// HTTP request construction failed (for example, the base URL is not a valid URI).
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Token builder validation failed.
	#[error("Unable to build token.")]
	TokenBuild(#[from] TokenBuilderError),
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_message_reconstructs_status_and_body() {
		let body = "{\"error\":{\"code\":403,\"type\":\"ApiException\"}}";
		let err = ApiError::new(403, body);

		assert_eq!(err.message(), format!("403:{body}"));
		assert_eq!(err.response_code(), 403);
		assert_eq!(err.response_body(), body);
		assert_eq!(err.response_bytes(), body.as_bytes());
		assert_eq!(Error::from(err).to_string(), format!("403:{body}"));
	}

	#[test]
	fn oauth_error_exposes_status_and_payload() {
		let error = ProviderError::parse("{\"error\":\"invalid_client\"}")
			.expect("Payload fixture should parse.");
		let err = OAuthError::Rejected {
			origin: OAuthOrigin::Grant(GrantType::ClientCredentials),
			status: 401,
			error: Box::new(error),
			body: String::new(),
		};

		assert_eq!(err.status(), Some(401));
		assert_eq!(err.provider_error().map(|e| e.error.as_str()), Some("invalid_client"));
		assert_eq!(
			err.to_string(),
			"Provider rejected the client_credentials grant: invalid_client."
		);
		assert_eq!(OAuthError::MissingRefreshToken.status(), None);
	}
}
