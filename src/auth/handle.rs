//! Shared token cell that publishes refreshed snapshots atomically.
//!
//! A [`TokenHandle`] wraps the current [`SpidToken`] as an `Arc` behind a read/write lock.
//! Readers clone the `Arc` and keep a consistent snapshot even while a refresh publishes a
//! replacement. Refreshes are serialized by an async guard so concurrent callers that find the
//! same expired token wait for one refresh instead of each hitting the token endpoint.

// crates.io
use async_lock::MutexGuard as AsyncMutexGuard;
// self
use crate::{
	_prelude::*,
	auth::{SpidToken, TokenSecret},
};

/// Cloneable handle to a logical credential; every clone observes the same snapshot.
#[derive(Clone)]
pub struct TokenHandle(Arc<TokenHandleInner>);

struct TokenHandleInner {
	current: RwLock<Arc<SpidToken>>,
	refresh_guard: AsyncMutex<()>,
}

impl TokenHandle {
	/// Wraps a token in a new handle.
	pub fn new(token: SpidToken) -> Self {
		Self(Arc::new(TokenHandleInner {
			current: RwLock::new(Arc::new(token)),
			refresh_guard: AsyncMutex::new(()),
		}))
	}

	/// Returns the current snapshot.
	pub fn snapshot(&self) -> Arc<SpidToken> {
		self.0.current.read().clone()
	}

	/// Publishes a new snapshot and returns the one it replaced.
	pub fn replace(&self, token: SpidToken) -> Arc<SpidToken> {
		self.publish(Arc::new(token))
	}

	/// Returns the current bearer credential.
	pub fn access_token(&self) -> TokenSecret {
		self.snapshot().access_token().clone()
	}

	/// Returns the current expiry instant.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.snapshot().expires_at()
	}

	/// Returns `true` if the current snapshot is expired.
	pub fn is_expired(&self) -> bool {
		self.snapshot().is_expired()
	}

	/// Returns `true` when both handles share the same cell.
	pub fn shares_cell_with(&self, other: &TokenHandle) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}

	pub(crate) fn publish(&self, token: Arc<SpidToken>) -> Arc<SpidToken> {
		std::mem::replace(&mut *self.0.current.write(), token)
	}

	pub(crate) async fn lock_refresh(&self) -> AsyncMutexGuard<'_, ()> {
		self.0.refresh_guard.lock().await
	}
}
impl From<SpidToken> for TokenHandle {
	fn from(token: SpidToken) -> Self {
		Self::new(token)
	}
}
impl Debug for TokenHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenHandle").field(&self.snapshot()).finish()
	}
}
