// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of a client's [`RefreshMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshCounts {
	/// Refreshes sent to the token endpoint.
	pub attempts: u64,
	/// Refreshes that published a new token into a handle.
	pub successes: u64,
	/// Refreshes that failed and left the handle untouched.
	pub failures: u64,
	/// Callers that waited on a handle's refresh guard and found a token another caller had
	/// already published.
	pub reuses: u64,
}

/// Thread-safe counters for the token refreshes a client performs on behalf of its handles.
///
/// Every refresh sent to the token endpoint ends as exactly one success or failure. Callers that
/// lose the singleflight race send nothing and are counted as reuses instead.
#[derive(Debug, Default)]
pub struct RefreshMetrics {
	attempts: AtomicU64,
	successes: AtomicU64,
	failures: AtomicU64,
	reuses: AtomicU64,
}
impl RefreshMetrics {
	/// Returns the total number of refreshes sent to the token endpoint.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of refreshes that published a new token.
	pub fn successes(&self) -> u64 {
		self.successes.load(Ordering::Relaxed)
	}

	/// Returns the number of failed refreshes.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	/// Returns how often a caller reused a token refreshed concurrently by another caller.
	pub fn reuses(&self) -> u64 {
		self.reuses.load(Ordering::Relaxed)
	}

	/// Copies every counter at once.
	pub fn snapshot(&self) -> RefreshCounts {
		RefreshCounts {
			attempts: self.attempts(),
			successes: self.successes(),
			failures: self.failures(),
			reuses: self.reuses(),
		}
	}

	/// Returns the number of refreshes that were sent but have not finished yet.
	pub fn in_flight(&self) -> u64 {
		let RefreshCounts { attempts, successes, failures, .. } = self.snapshot();

		attempts.saturating_sub(successes + failures)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reuse(&self) {
		self.reuses.fetch_add(1, Ordering::Relaxed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn snapshot_tracks_every_counter() {
		let metrics = RefreshMetrics::default();

		metrics.record_attempt();
		metrics.record_attempt();
		metrics.record_success();
		metrics.record_reuse();

		assert_eq!(
			metrics.snapshot(),
			RefreshCounts { attempts: 2, successes: 1, failures: 0, reuses: 1 }
		);
		assert_eq!(metrics.in_flight(), 1);

		metrics.record_failure();

		assert_eq!(metrics.in_flight(), 0);
	}
}
