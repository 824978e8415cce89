//! Observability helpers for request and refresh flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `authed_http.flow` with the `flow`, `stage`,
//!   `method`, `path`, and `attempt` fields.
//! - Enable `metrics` to increment the `authed_http_flow_total` counter for every
//!   attempt/success/failure/retry, labeled by `flow` + `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Emits a `tracing` event under the crate target.
///
/// Fields take the `name = %value` or `name = ?value` form. Without the feature the values are
/// only borrowed, so call sites compile the same either way.
macro_rules! flow_event {
	($level:ident, $($field:ident = $sigil:tt $value:expr,)* $message:literal) => {{
		#[cfg(feature = "tracing")]
		tracing::$level!(target: "authed_http", $($field = $sigil $value,)* $message);
		#[cfg(not(feature = "tracing"))]
		let _ = ($(&$value,)*);
	}};
}
pub(crate) use flow_event;

/// Flow kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// One caller-visible API request, including any retries.
	Request,
	/// One call to the refresh collaborator.
	Refresh,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Request => "request",
			FlowKind::Refresh => "refresh",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a flow.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported back to the caller.
	Failure,
	/// Request re-dispatched after a successful refresh.
	Retry,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Retry => "retry",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
