//! OAuth 2.0 grants the client performs against the token endpoint.

// self
use crate::_prelude::*;

/// OAuth 2.0 grant types performed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
	/// Authorization Code exchange on behalf of an end user.
	AuthorizationCode,
	/// Refresh Token grant renewing an issued token.
	RefreshToken,
	/// Client Credentials grant for server-to-server tokens.
	ClientCredentials,
}
impl GrantType {
	/// Returns the RFC 6749 identifier for the grant type.
	pub fn as_str(self) -> &'static str {
		match self {
			GrantType::AuthorizationCode => "authorization_code",
			GrantType::RefreshToken => "refresh_token",
			GrantType::ClientCredentials => "client_credentials",
		}
	}
}
impl Display for GrantType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
