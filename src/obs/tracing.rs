// self
use crate::_prelude::*;

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedPass<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPass<F> = F;

/// A span builder used by the guard.
#[derive(Clone, Debug)]
pub struct GuardSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl GuardSpan {
	/// Creates a new span tagged with the provided stage.
	pub fn new(stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("remote_authz.authorize", stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPass<Fut>
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

/// Emits a debug event (when tracing is enabled).
macro_rules! trace_debug {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		tracing::debug!($($arg)*);
	};
}
/// Emits a warning event (when tracing is enabled).
macro_rules! trace_warn {
	($($arg:tt)*) => {
		#[cfg(feature = "tracing")]
		tracing::warn!($($arg)*);
	};
}
pub(crate) use {trace_debug, trace_warn};

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = GuardSpan::new("instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
