//! Tagged success/failure envelope returned for every call.

// crates.io
use serde::Serializer;
// self
use crate::_prelude::*;

/// Outcome of one API call; exactly one variant is produced per call.
///
/// Serializes as `{"success":true,"data":..}` or
/// `{"success":false,"errorCode":..,"errorMessage":..}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiResponse<T> {
	/// Server answered 200; carries the body's `data` payload verbatim.
	Success {
		/// Decoded `data` payload.
		data: T,
	},
	/// Any other outcome the caller chose to receive as a value.
	Failure {
		/// HTTP status, when one is known.
		error_code: Option<u16>,
		/// Best available message.
		error_message: Option<String>,
	},
}
impl<T> ApiResponse<T> {
	/// Builds the failure variant from an error.
	pub fn from_error(err: &Error) -> Self {
		Self::Failure { error_code: err.status(), error_message: err.envelope_message() }
	}

	/// Returns `true` for the success variant.
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}

	/// Borrows the success payload.
	pub fn data(&self) -> Option<&T> {
		match self {
			Self::Success { data } => Some(data),
			Self::Failure { .. } => None,
		}
	}

	/// Consumes the envelope, returning the success payload.
	pub fn into_data(self) -> Option<T> {
		match self {
			Self::Success { data } => Some(data),
			Self::Failure { .. } => None,
		}
	}

	/// Failure status code, if this is a failure that carries one.
	pub fn error_code(&self) -> Option<u16> {
		match self {
			Self::Failure { error_code, .. } => *error_code,
			Self::Success { .. } => None,
		}
	}

	/// Failure message, if this is a failure that carries one.
	pub fn error_message(&self) -> Option<&str> {
		match self {
			Self::Failure { error_message, .. } => error_message.as_deref(),
			Self::Success { .. } => None,
		}
	}

	/// Maps the success payload.
	pub fn map<U, F>(self, f: F) -> ApiResponse<U>
	where
		F: FnOnce(T) -> U,
	{
		match self {
			Self::Success { data } => ApiResponse::Success { data: f(data) },
			Self::Failure { error_code, error_message } =>
				ApiResponse::Failure { error_code, error_message },
		}
	}
}
impl<T> Serialize for ApiResponse<T>
where
	T: Serialize,
{
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		#[derive(Serialize)]
		#[serde(rename_all = "camelCase")]
		struct Envelope<'a, T> {
			success: bool,
			#[serde(skip_serializing_if = "Option::is_none")]
			data: Option<&'a T>,
			#[serde(skip_serializing_if = "Option::is_none")]
			error_code: Option<u16>,
			#[serde(skip_serializing_if = "Option::is_none")]
			error_message: Option<&'a str>,
		}

		let envelope = match self {
			Self::Success { data } =>
				Envelope { success: true, data: Some(data), error_code: None, error_message: None },
			Self::Failure { error_code, error_message } => Envelope {
				success: false,
				data: None,
				error_code: *error_code,
				error_message: error_message.as_deref(),
			},
		};

		envelope.serialize(serializer)
	}
}
