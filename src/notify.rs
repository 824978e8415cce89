//! User-facing error notification seam.

/// Displays a failure message to the user.
///
/// Implementations must be cheap and must not fail; the client calls
/// [`show_error`](ErrorNotifier::show_error) at most once per request and never inspects the
/// outcome. Any `Fn(&str)` closure qualifies.
pub trait ErrorNotifier
where
	Self: Send + Sync,
{
	/// Shows `message` to the user.
	fn show_error(&self, message: &str);
}
impl<F> ErrorNotifier for F
where
	F: Send + Sync + Fn(&str),
{
	fn show_error(&self, message: &str) {
		self(message)
	}
}

/// Default notifier for headless use: emits a `warn` event when `tracing` is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;
impl ErrorNotifier for LogNotifier {
	fn show_error(&self, message: &str) {
		#[cfg(feature = "tracing")]
		tracing::warn!(target: "authed_http::notify", %message, "request failed");
		#[cfg(not(feature = "tracing"))]
		let _ = message;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_prelude::Mutex;

	#[test]
	fn closures_are_notifiers() {
		let seen = Mutex::new(Vec::new());
		let notifier = |message: &str| seen.lock().push(message.to_owned());

		notifier.show_error("boom");
		LogNotifier.show_error("logged");

		assert_eq!(*seen.lock(), vec!["boom".to_owned()]);
	}
}
