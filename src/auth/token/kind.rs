//! Grant context classification for issued tokens.

// self
use crate::_prelude::*;

/// Identifies who a token acts for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
	/// Server-to-server token with no associated end user.
	Client,
	/// Token delegated by an end user.
	User,
}
impl TokenType {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenType::Client => "client",
			TokenType::User => "user",
		}
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
