//! Optional observability for token grants, refreshes, and resource calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `spid_client.flow` with the `flow` and
//!   `stage` (call site) fields, plus a debug event for every failed flow.
//! - Enable `metrics` to increment the `spid_client_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`. Refreshes skipped in favor of a
//!   concurrently published token count toward `spid_client_refresh_reused_total`, and signed
//!   responses toward `spid_client_signed_response_total` labeled by `verdict`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Client operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Server token issuance (`client_credentials`).
	ClientCredentials,
	/// User token issuance from an authorization code.
	AuthorizationCode,
	/// Renewal of an expired token.
	Refresh,
	/// Authenticated resource call.
	ApiRequest,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::ClientCredentials => "client_credentials",
			FlowKind::AuthorizationCode => "authorization_code",
			FlowKind::Refresh => "refresh",
			FlowKind::ApiRequest => "api_request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the terminal outcome of a flow result and logs failures on the current span.
pub fn record_result<T>(kind: FlowKind, result: &Result<T>) {
	match result {
		Ok(_) => record_flow_outcome(kind, FlowOutcome::Success),
		Err(e) => {
			record_flow_failure(kind, e);
			record_flow_outcome(kind, FlowOutcome::Failure);
		},
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::ApiError;

	#[test]
	fn labels_are_stable() {
		assert_eq!(FlowKind::ApiRequest.to_string(), "api_request");
		assert_eq!(FlowKind::ClientCredentials.as_str(), "client_credentials");
		assert_eq!(FlowOutcome::Failure.to_string(), "failure");
	}

	#[test]
	fn record_result_accepts_both_outcomes() {
		record_result(FlowKind::Refresh, &Ok::<_, Error>(()));
		record_result::<()>(FlowKind::ApiRequest, &Err(ApiError::new(500, "boom").into()));
	}
}
