//! Immutable token snapshots, lifecycle helpers, and builders.

// crates.io
use time::PrimitiveDateTime;
// self
use crate::{
	_prelude::*,
	auth::token::{kind::TokenType, secret::TokenSecret},
};

/// Errors produced by [`SpidTokenBuilder`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum TokenBuilderError {
	/// Issued when no access token value was provided.
	#[error("Access token is required.")]
	MissingAccessToken,
	/// Issued when no expiry (absolute or relative) was configured.
	#[error("Expiry must be supplied via expires_at or expires_in.")]
	MissingExpiry,
	/// Issued when the relative expiry lands outside the representable instant range.
	#[error("Expiry does not fit in the supported time range.")]
	ExpiryOutOfRange,
}

/// Immutable snapshot of an issued OAuth token.
///
/// Refreshing never mutates a snapshot; it produces a new one that is published through a
/// [`TokenHandle`](crate::auth::TokenHandle).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpidToken {
	access_token: TokenSecret,
	refresh_token: Option<TokenSecret>,
	token_type: TokenType,
	issued_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl SpidToken {
	/// Creates a token issued now that expires after `expires_in` seconds.
	///
	/// Zero or negative lifetimes produce a token that is already expired. Lifetimes beyond the
	/// representable range saturate at the earliest or latest supported instant; use
	/// [`SpidToken::try_new`] to reject them instead.
	pub fn new(
		access_token: impl Into<String>,
		expires_in: i64,
		refresh_token: Option<String>,
		token_type: TokenType,
	) -> Self {
		let issued_at = OffsetDateTime::now_utc();
		let expires_at = issued_at.checked_add(Duration::seconds(expires_in)).unwrap_or_else(|| {
			if expires_in.is_negative() {
				PrimitiveDateTime::MIN.assume_utc()
			} else {
				PrimitiveDateTime::MAX.assume_utc()
			}
		});

		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: refresh_token.map(TokenSecret::new),
			token_type,
			issued_at,
			expires_at,
		}
	}

	/// Creates a token issued now, failing when `expires_in` seconds cannot be added to the
	/// current instant.
	pub fn try_new(
		access_token: impl Into<String>,
		expires_in: i64,
		refresh_token: Option<String>,
		token_type: TokenType,
	) -> Result<Self, TokenBuilderError> {
		let builder = Self::builder(token_type)
			.access_token(access_token)
			.issued_at(OffsetDateTime::now_utc())
			.expires_in(Duration::seconds(expires_in));

		match refresh_token {
			Some(refresh_token) => builder.refresh_token(refresh_token).build(),
			None => builder.build(),
		}
	}

	/// Returns a builder for tokens with explicit instants.
	pub fn builder(token_type: TokenType) -> SpidTokenBuilder {
		SpidTokenBuilder::new(token_type)
	}

	/// Bearer credential presented on resource calls.
	pub fn access_token(&self) -> &TokenSecret {
		&self.access_token
	}

	/// Refresh credential, if the provider issued one.
	pub fn refresh_token(&self) -> Option<&TokenSecret> {
		self.refresh_token.as_ref()
	}

	/// Grant context the token was issued for.
	pub fn token_type(&self) -> TokenType {
		self.token_type
	}

	/// Instant the token was minted.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Instant the token stops being valid.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Lifetime the token was minted with.
	pub fn expires_in(&self) -> Duration {
		self.expires_at - self.issued_at
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Returns `true` if the token is expired relative to the current clock.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}

	/// Remaining lifetime at the provided instant, clamped at zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for SpidToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SpidToken")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.field("token_type", &self.token_type)
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

/// Builder for [`SpidToken`].
#[derive(Clone, Debug)]
pub struct SpidTokenBuilder {
	token_type: TokenType,
	access_token: Option<TokenSecret>,
	refresh_token: Option<TokenSecret>,
	issued_at: Option<OffsetDateTime>,
	expires_at: Option<OffsetDateTime>,
	expires_in: Option<Duration>,
}
impl SpidTokenBuilder {
	fn new(token_type: TokenType) -> Self {
		Self {
			token_type,
			access_token: None,
			refresh_token: None,
			issued_at: None,
			expires_at: None,
			expires_in: None,
		}
	}

	/// Sets the issued-at instant.
	pub fn issued_at(mut self, instant: OffsetDateTime) -> Self {
		self.issued_at = Some(instant);

		self
	}

	/// Sets an absolute expiry instant.
	pub fn expires_at(mut self, instant: OffsetDateTime) -> Self {
		self.expires_at = Some(instant);

		self
	}

	/// Sets a relative expiry duration from the issued instant.
	pub fn expires_in(mut self, duration: Duration) -> Self {
		self.expires_in = Some(duration);

		self
	}

	/// Provides the access token value.
	pub fn access_token(mut self, token: impl Into<String>) -> Self {
		self.access_token = Some(TokenSecret::new(token));

		self
	}

	/// Provides the refresh token value.
	pub fn refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(TokenSecret::new(token));

		self
	}

	/// Consumes the builder and produces a [`SpidToken`].
	pub fn build(self) -> Result<SpidToken, TokenBuilderError> {
		let access_token = self.access_token.ok_or(TokenBuilderError::MissingAccessToken)?;
		let issued_at = self.issued_at.unwrap_or_else(OffsetDateTime::now_utc);
		let expires_at = match (self.expires_at, self.expires_in) {
			(Some(instant), _) => instant,
			(None, Some(delta)) =>
				issued_at.checked_add(delta).ok_or(TokenBuilderError::ExpiryOutOfRange)?,
			(None, None) => return Err(TokenBuilderError::MissingExpiry),
		};

		Ok(SpidToken {
			access_token,
			refresh_token: self.refresh_token,
			token_type: self.token_type,
			issued_at,
			expires_at,
		})
	}
}
