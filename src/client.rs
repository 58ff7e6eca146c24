//! The SPID client facade: URL construction, token helpers, and authenticated resource calls.

mod metrics;
mod request;
mod response;
mod token;
mod urls;

pub use metrics::{RefreshCounts, RefreshMetrics};
pub use response::ApiResponse;

// self
use crate::{_prelude::*, config::SpidConfig, http::SpidHttpClient, oauth::TokenAcquirer};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSpidClient = SpidClient<ReqwestHttpClient>;

/// Coordinates token acquisition, refresh, and resource calls against one SPID deployment.
///
/// The client owns the configuration and the HTTP transport; callers own their tokens through
/// [`TokenHandle`](crate::auth::TokenHandle)s. Every method runs on the caller's task and makes
/// at most one token endpoint call and one resource call.
pub struct SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Validated client configuration.
	pub config: Arc<SpidConfig>,
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	acquirer: TokenAcquirer<C>,
}
impl<C> SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Creates a client that sends every request through the caller-provided transport.
	pub fn with_http_client(
		config: impl Into<Arc<SpidConfig>>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		let config = config.into();
		let http_client = http_client.into();

		Self {
			acquirer: TokenAcquirer::new(config.clone(), http_client.clone()),
			config,
			http_client,
			refresh_metrics: Default::default(),
		}
	}

	/// Returns the token acquirer backing the grant helpers.
	pub fn acquirer(&self) -> &TokenAcquirer<C> {
		&self.acquirer
	}
}
#[cfg(feature = "reqwest")]
impl SpidClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	///
	/// Use [`SpidClient::with_http_client`] with [`ReqwestHttpClient::with_client`] to configure
	/// timeouts, proxies, or redirect policy.
	pub fn new(config: impl Into<Arc<SpidConfig>>) -> Self {
		Self::with_http_client(config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			http_client: self.http_client.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			acquirer: self.acquirer.clone(),
		}
	}
}
impl<C> Debug for SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SpidClient")
			.field("base_url", &self.config.base_url)
			.field("client_id", &self.config.client_id)
			.field("api_version", &self.config.api_version)
			.finish()
	}
}
