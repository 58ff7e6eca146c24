// self
use crate::{
	_prelude::*,
	obs::{FlowKind, FlowOutcome},
};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"spid_client_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Counts a caller that skipped the token endpoint because a concurrent refresh already
/// published a fresh token.
pub fn record_refresh_reuse() {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("spid_client_refresh_reused_total").increment(1);
	}
}

/// Counts the verification result of a signed resource response.
pub fn record_envelope_verification<T>(result: &Result<T>) {
	let verdict = envelope_verdict(result);

	#[cfg(feature = "metrics")]
	{
		metrics::counter!("spid_client_signed_response_total", "verdict" => verdict).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = verdict;
	}
}

fn envelope_verdict<T>(result: &Result<T>) -> &'static str {
	match result {
		Ok(_) => "verified",
		Err(Error::SignatureMismatch) => "mismatch",
		Err(_) => "malformed",
	}
}
