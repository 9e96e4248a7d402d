//! Optional observability helpers for authorization passes.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `remote_authz.authorize` with a `stage`
//!   field, plus events for rejections, denials, and transport failures.
//! - Enable `metrics` to increment the `remote_authz_decision_total` counter for every
//!   attempt and terminal outcome, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;
pub(crate) use tracing::{trace_debug, trace_warn};

// self
use crate::_prelude::*;

/// Outcome labels recorded for each authorization pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DecisionOutcome {
	/// Entry to the guard.
	Attempt,
	/// The authorization service answered `200`.
	Authorized,
	/// The token strategy rejected the request; no outbound call was made.
	Rejected,
	/// The authorization service answered with any other status.
	Denied,
	/// The guard failed closed (unreachable service or unresolvable resource).
	Unavailable,
}
impl DecisionOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			DecisionOutcome::Attempt => "attempt",
			DecisionOutcome::Authorized => "authorized",
			DecisionOutcome::Rejected => "rejected",
			DecisionOutcome::Denied => "denied",
			DecisionOutcome::Unavailable => "unavailable",
		}
	}
}
impl Display for DecisionOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
