// self
use crate::{_prelude::*, obs::FlowKind, provider::error::truncate_preview};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("spid_client.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event tagged with the flow kind.
pub fn record_flow_event(kind: FlowKind, message: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(flow = kind.as_str(), "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, message);
	}
}

/// Emits a debug event describing a failed flow.
///
/// Provider descriptions and resource bodies are truncated before they reach the event, and
/// secrets never do: errors only carry provider payloads and status codes.
pub fn record_flow_failure(kind: FlowKind, error: &Error) {
	let failure = FailureSummary::new(error);

	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			flow = kind.as_str(),
			status = failure.status,
			provider_error = failure.provider_error.as_deref(),
			detail = %failure.detail,
			"SPID client flow failed."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, failure);
	}
}

/// Bounded view of a failure that is safe to attach to log events.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
struct FailureSummary {
	status: Option<u16>,
	provider_error: Option<String>,
	detail: String,
}
impl FailureSummary {
	fn new(error: &Error) -> Self {
		match error {
			Error::OAuth(oauth) => match oauth.provider_error() {
				Some(provider) => Self {
					status: oauth.status(),
					provider_error: Some(truncate_preview(&provider.error)),
					detail: provider.description_preview().unwrap_or_default(),
				},
				None => Self {
					status: oauth.status(),
					provider_error: None,
					detail: oauth.to_string(),
				},
			},
			Error::Api(api) => Self {
				status: Some(api.status),
				provider_error: None,
				detail: truncate_preview(&api.body),
			},
			other => Self { status: None, provider_error: None, detail: other.to_string() },
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::{ApiError, OAuthError, OAuthOrigin},
		provider::{GrantType, ProviderError},
	};

	#[test]
	fn flow_failure_noop_without_tracing() {
		record_flow_failure(FlowKind::Refresh, &Error::SignatureMismatch);
	}

	#[test]
	fn failure_summary_bounds_provider_text() {
		let error = ProviderError {
			error: "invalid_grant".into(),
			error_code: None,
			error_type: None,
			error_description: Some("x".repeat(1_000)),
		};
		let rejected: Error = OAuthError::Rejected {
			origin: OAuthOrigin::Grant(GrantType::RefreshToken),
			status: 400,
			error: Box::new(error),
			body: String::new(),
		}
		.into();
		let summary = FailureSummary::new(&rejected);

		assert_eq!(summary.status, Some(400));
		assert_eq!(summary.provider_error.as_deref(), Some("invalid_grant"));
		assert_eq!(summary.detail.chars().count(), 257);

		let summary = FailureSummary::new(&ApiError::new(500, "y".repeat(1_000)).into());

		assert_eq!(summary.status, Some(500));
		assert_eq!(summary.detail.chars().count(), 257);

		let summary = FailureSummary::new(&Error::SignatureMismatch);

		assert_eq!(summary.status, None);
		assert_eq!(summary.detail, "Signed response failed signature verification.");
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Refresh, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
