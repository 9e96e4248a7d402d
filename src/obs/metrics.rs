// self
use crate::obs::DecisionOutcome;

/// Records a decision outcome via the global metrics recorder (when enabled).
pub fn record_decision(outcome: DecisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("remote_authz_decision_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
