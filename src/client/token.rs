//! Token issuance and refresh helpers.
//!
//! Refreshes through a [`TokenHandle`] are singleflight: callers that find the same expired
//! snapshot queue on the handle's refresh guard, and everyone after the first re-checks the
//! snapshot once the guard is theirs, reusing the token the first caller published.

// self
use crate::{
	_prelude::*,
	auth::{SpidToken, TokenHandle},
	client::SpidClient,
	http::SpidHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl<C> SpidClient<C>
where
	C: ?Sized + SpidHttpClient,
{
	/// Obtains a server-to-server token through the `client_credentials` grant.
	pub async fn server_token(&self) -> Result<SpidToken> {
		const KIND: FlowKind = FlowKind::ClientCredentials;

		let span = FlowSpan::new(KIND, "server_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.acquirer.client_credentials()).await;

		obs::record_result(KIND, &result);

		result
	}

	/// Exchanges an authorization code using the configured redirect URI.
	pub async fn user_token(&self, code: &str) -> Result<SpidToken> {
		self.user_token_with_redirect(code, &self.config.redirect_uri).await
	}

	/// Exchanges an authorization code that was issued for `redirect_uri`.
	pub async fn user_token_with_redirect(
		&self,
		code: &str,
		redirect_uri: &str,
	) -> Result<SpidToken> {
		const KIND: FlowKind = FlowKind::AuthorizationCode;

		let span = FlowSpan::new(KIND, "user_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.acquirer.authorization_code(code, redirect_uri)).await;

		obs::record_result(KIND, &result);

		result
	}

	/// Refreshes the handle's token regardless of its expiry and publishes the result.
	pub async fn refresh_token(&self, handle: &TokenHandle) -> Result<Arc<SpidToken>> {
		let _singleflight = handle.lock_refresh().await;
		let current = handle.snapshot();

		self.refresh_and_publish(handle, &current, "refresh_token").await
	}

	/// Returns a snapshot that is not expired, refreshing the handle at most once.
	pub(crate) async fn ensure_fresh(&self, handle: &TokenHandle) -> Result<Arc<SpidToken>> {
		let current = handle.snapshot();

		if !current.is_expired() {
			return Ok(current);
		}

		let _singleflight = handle.lock_refresh().await;
		let current = handle.snapshot();

		if !current.is_expired() {
			obs::record_flow_event(FlowKind::Refresh, "Reusing a concurrently refreshed token.");
			obs::record_refresh_reuse();
			self.refresh_metrics.record_reuse();

			return Ok(current);
		}

		self.refresh_and_publish(handle, &current, "ensure_fresh").await
	}

	async fn refresh_and_publish(
		&self,
		handle: &TokenHandle,
		current: &SpidToken,
		stage: &'static str,
	) -> Result<Arc<SpidToken>> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, stage);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span.instrument(self.acquirer.refresh(current)).await.map(|token| {
			let token = Arc::new(token);

			handle.publish(token.clone());

			token
		});

		match &result {
			Ok(_) => self.refresh_metrics.record_success(),
			Err(_) => self.refresh_metrics.record_failure(),
		}

		obs::record_result(KIND, &result);

		result
	}
}
