// self
use crate::{_prelude::*, obs::FlowKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// Span wrapper used by client flows; compiles to nothing without the `tracing` feature.
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
			let span = tracing::info_span!(
				"authed_http.flow",
				flow = kind.as_str(),
				stage,
				method = tracing::field::Empty,
				path = tracing::field::Empty,
				attempt = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Records the HTTP method and URL template being requested.
	///
	/// The template is recorded before substitution so path variables stay out of the logs.
	pub fn with_target(self, method: &http::Method, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			self.span.record("method", method.as_str());
			self.span.record("path", path);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (method, path);
		}

		self
	}

	/// Records the zero-based dispatch attempt currently in flight.
	pub fn record_attempt(&self, attempt: u8) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("attempt", attempt);
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = attempt;
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
