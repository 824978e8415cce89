//! Client-level error types shared across the transport, store, and refresh layers.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); no HTTP response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Server answered with a status other than 200.
	#[error("Request failed with status {status}.")]
	Api {
		/// HTTP status code returned by the server.
		status: u16,
		/// Message embedded in the response body, if any.
		message: Option<String>,
	},
	/// Server answered 200 but the `data` payload did not match the expected shape.
	#[error("Response data could not be decoded.")]
	Decode {
		/// HTTP status code returned by the server.
		status: u16,
		/// Structured decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Access token expired and the refresh token is no longer usable.
	#[error("Refresh token expired, please log in again.")]
	RefreshTokenExpired,
	/// The refresh endpoint failed or declined to issue a new token.
	#[error("Token refresh failed, please log in again.")]
	RefreshFailed {
		/// Underlying refresh failure, when the refresher reported one.
		#[source]
		source: Option<Box<Error>>,
	},
}
impl Error {
	/// HTTP status associated with the failure, if any.
	///
	/// Refresh-related failures always report `401`.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api { status, .. } | Self::Decode { status, .. } => Some(*status),
			Self::RefreshTokenExpired | Self::RefreshFailed { .. } => Some(401),
			_ => None,
		}
	}

	/// Message the server embedded in its error response.
	pub fn server_message(&self) -> Option<&str> {
		match self {
			Self::Api { message, .. } => message.as_deref(),
			_ => None,
		}
	}

	/// Returns `true` for the terminal authentication failures that clear stored credentials.
	pub fn is_auth_terminal(&self) -> bool {
		matches!(self, Self::RefreshTokenExpired | Self::RefreshFailed { .. })
	}

	/// Message suitable for a user-facing notification, if the error carries one.
	///
	/// Only server-provided messages and the fixed refresh messages qualify; everything else
	/// falls back to the configured default.
	pub(crate) fn notice(&self) -> Option<String> {
		match self {
			Self::Api { message, .. } => message.clone(),
			Self::RefreshTokenExpired | Self::RefreshFailed { .. } => Some(self.to_string()),
			_ => None,
		}
	}

	/// Message recorded in a failure envelope.
	pub(crate) fn envelope_message(&self) -> Option<String> {
		match self {
			Self::Api { message, .. } => message.clone(),
			_ => Some(self.to_string()),
		}
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Resolved request path cannot be joined onto the base URL.
	#[error("Request path `{path}` cannot be resolved against the base URL.")]
	InvalidRequestUrl {
		/// Path after placeholder substitution.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Access token contains characters that are not valid in a header.
	#[error("Access token cannot be encoded as an Authorization header.")]
	InvalidAuthorizationHeader(#[from] http::header::InvalidHeaderValue),
	/// Request body could not be serialized to JSON.
	#[error("Request body could not be serialized.")]
	BodySerialization(#[source] serde_json::Error),
}

/// Transport-level failures where no HTTP response was received.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// URL that was being requested.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised while requesting `url`.
	pub fn network(url: impl Display, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn refresh_failures_report_unauthorized_status() {
		assert_eq!(Error::RefreshTokenExpired.status(), Some(401));
		assert_eq!(Error::RefreshFailed { source: None }.status(), Some(401));
		assert!(Error::RefreshTokenExpired.is_auth_terminal());
		assert_eq!(
			Error::RefreshTokenExpired.notice().as_deref(),
			Some("Refresh token expired, please log in again.")
		);
	}

	#[test]
	fn api_errors_expose_server_message() {
		let err = Error::Api { status: 403, message: Some("Forbidden resource".into()) };

		assert_eq!(err.status(), Some(403));
		assert_eq!(err.server_message(), Some("Forbidden resource"));
		assert_eq!(err.notice().as_deref(), Some("Forbidden resource"));
		assert_eq!(err.envelope_message().as_deref(), Some("Forbidden resource"));

		let bare = Error::Api { status: 500, message: None };

		assert_eq!(bare.notice(), None);
		assert_eq!(bare.envelope_message(), None);
	}

	#[test]
	fn transport_errors_have_no_status_and_no_notice() {
		let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
		let err = Error::from(TransportError::network("https://api.example.com/x", io));

		assert_eq!(err.status(), None);
		assert_eq!(err.notice(), None);
		assert_eq!(
			err.envelope_message().as_deref(),
			Some("Network error occurred while calling https://api.example.com/x.")
		);
		assert!(StdError::source(&err).is_some());
	}
}
