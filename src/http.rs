//! HTTP execution port for token and resource calls.
//!
//! The module exposes [`SpidHttpClient`], the client's only dependency on an HTTP stack, along
//! with [`ResponseKind`] so implementations (and test doubles) can tell token endpoint calls
//! apart from resource calls. Requests and responses use the `http` types re-exported by the
//! `oauth2` crate, so implementors never see client internals.

mod fixed;

pub use fixed::*;
pub use oauth2::{HttpRequest, HttpResponse, http::Method};

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::_prelude::*;

/// Boxed future returned by [`SpidHttpClient::execute`].
pub type HttpFuture<'a, E> = Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Which kind of response the caller expects from a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseKind {
	/// Token endpoint response (grant, exchange, refresh).
	Token,
	/// Protected resource response.
	Resource,
}
impl ResponseKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ResponseKind::Token => "token",
			ResponseKind::Resource => "resource",
		}
	}
}

/// Abstraction over HTTP transports capable of executing prepared provider requests.
///
/// The client owns an implementation behind `Arc<C>` and calls [`execute`](Self::execute) once
/// per token exchange or resource call; nothing is retried at this layer. Implementations must
/// be `Send + Sync + 'static` so one transport can back many clients, and the returned future
/// must be `Send`. Non-2xx statuses are responses, not errors: return them as [`HttpResponse`]
/// values and reserve `Err` for failures that produced no response at all. Timeouts and
/// cancellation are the implementation's concern.
pub trait SpidHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes a prepared request.
	fn execute(
		&self,
		request: HttpRequest,
		kind: ResponseKind,
	) -> HttpFuture<'_, Self::TransportError>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests should not follow redirects, matching OAuth 2.0 guidance that token endpoints
/// return results directly instead of delegating to another URI. Configure any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] accordingly, along with the
/// timeouts the deployment needs.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl SpidHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(
		&self,
		request: HttpRequest,
		_kind: ResponseKind,
	) -> HttpFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
