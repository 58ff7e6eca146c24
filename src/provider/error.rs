//! OAuth error payloads returned by the provider and their classification.
//!
//! SPID answers rejected grants and rejected credentials with
//! `{"error":"expired_token","error_code":"401","type":"OAuthException","error_description":"..."}`.
//! Resource-level failures use a different shape (`error` is an object), so a payload is only
//! recognized when `error` is a string.

// crates.io
use serde::Deserializer;
use serde_json::Value;
// self
use crate::_prelude::*;

const PREVIEW_LIMIT: usize = 256;

/// Canonical categories for provider error payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderErrorKind {
	/// Provider rejected the authorization grant (bad code or refresh token).
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Presented access token is expired or unknown.
	InvalidToken,
	/// Token does not cover the requested operation.
	InsufficientScope,
	/// Failure is temporary and may succeed later.
	Transient,
	/// Payload did not match any known category.
	Other,
}

/// OAuth error payload parsed from a provider response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
	/// OAuth `error` code (e.g. `invalid_grant`, `expired_token`).
	pub error: String,
	/// Provider-specific numeric code, kept as text.
	#[serde(default, deserialize_with = "string_or_number")]
	pub error_code: Option<String>,
	/// Provider exception type (e.g. `OAuthException`).
	#[serde(default, rename = "type")]
	pub error_type: Option<String>,
	/// Human-readable description.
	#[serde(default)]
	pub error_description: Option<String>,
}
impl ProviderError {
	/// Parses a response body, returning `None` when it is not an OAuth error payload.
	pub fn parse(body: &str) -> Option<Self> {
		serde_json::from_str(body).ok()
	}

	/// Classifies the payload, falling back to the HTTP status when the fields are unknown.
	pub fn kind(&self, status: Option<u16>) -> ProviderErrorKind {
		match_exact_value(&self.error)
			.or_else(|| self.error_description.as_deref().and_then(match_exact_value))
			.or_else(|| classify_text(self.error_description.as_deref()))
			.unwrap_or_else(|| classify_status(status))
	}

	/// Returns the description truncated to 256 characters for log output.
	pub fn description_preview(&self) -> Option<String> {
		self.error_description.as_deref().map(truncate_preview)
	}
}
impl Display for ProviderError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.error_description {
			Some(description) => write!(f, "{} ({description})", self.error),
			None => f.write_str(&self.error),
		}
	}
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::String(text)) => Some(text),
		Some(Value::Number(number)) => Some(number.to_string()),
		_ => None,
	})
}

/// Truncates provider-supplied text to a bounded preview, marking the cut with `…`.
pub(crate) fn truncate_preview(text: &str) -> String {
	if text.chars().count() <= PREVIEW_LIMIT {
		return text.to_owned();
	}

	let mut buf = text.chars().take(PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}

fn match_exact_value(value: &str) -> Option<ProviderErrorKind> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ProviderErrorKind::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ProviderErrorKind::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_token")
		|| value.eq_ignore_ascii_case("expired_token")
	{
		Some(ProviderErrorKind::InvalidToken)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ProviderErrorKind::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ProviderErrorKind::Transient)
	} else {
		None
	}
}

fn classify_text(text: Option<&str>) -> Option<ProviderErrorKind> {
	let lowered = text?.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ProviderErrorKind::InvalidGrant),
		text if text.contains("invalid_client") => Some(ProviderErrorKind::InvalidClient),
		text if text.contains("expired") || text.contains("invalid_token") =>
			Some(ProviderErrorKind::InvalidToken),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ProviderErrorKind::InsufficientScope),
		text if text.contains("temporarily_unavailable") => Some(ProviderErrorKind::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ProviderErrorKind {
	match status {
		Some(400 | 404 | 410) => ProviderErrorKind::InvalidGrant,
		Some(401) => ProviderErrorKind::InvalidToken,
		Some(403) => ProviderErrorKind::InsufficientScope,
		Some(429) => ProviderErrorKind::Transient,
		Some(code) if code >= 500 => ProviderErrorKind::Transient,
		_ => ProviderErrorKind::Other,
	}
}
