// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::DecisionOutcome;

/// Thread-safe counters for authorization passes.
#[derive(Debug, Default)]
pub struct GuardMetrics {
	attempts: AtomicU64,
	authorized: AtomicU64,
	rejected: AtomicU64,
	denied: AtomicU64,
	unavailable: AtomicU64,
}
impl GuardMetrics {
	/// Returns the total number of passes.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of passes the authorization service approved.
	pub fn authorized(&self) -> u64 {
		self.authorized.load(Ordering::Relaxed)
	}

	/// Returns the number of passes rejected for a missing or malformed token.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Returns the number of passes the authorization service denied.
	pub fn denied(&self) -> u64 {
		self.denied.load(Ordering::Relaxed)
	}

	/// Returns the number of passes that failed closed.
	pub fn unavailable(&self) -> u64 {
		self.unavailable.load(Ordering::Relaxed)
	}

	pub(crate) fn record(&self, outcome: DecisionOutcome) {
		let counter = match outcome {
			DecisionOutcome::Attempt => &self.attempts,
			DecisionOutcome::Authorized => &self.authorized,
			DecisionOutcome::Rejected => &self.rejected,
			DecisionOutcome::Denied => &self.denied,
			DecisionOutcome::Unavailable => &self.unavailable,
		};

		counter.fetch_add(1, Ordering::Relaxed);
	}
}
