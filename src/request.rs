//! Caller-supplied request descriptors and their error-handling policy flags.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method};
// self
use crate::{_prelude::*, error::ConfigError, path::PathVariables};

/// Everything needed to issue one API call.
///
/// The URL is a template that may carry `:name` placeholders, resolved against the client's base
/// URL after substitution. The three policy flags are independent of each other:
///
/// - `ignore_auth` skips credential attachment and the refresh protocol entirely.
/// - `silent_error` suppresses the user-facing notification.
/// - `throw_error` turns a failure envelope into an `Err`.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
	/// URL template, relative to the base URL unless absolute.
	pub url: String,
	/// HTTP method.
	pub method: Method,
	/// Extra request headers.
	pub headers: HeaderMap,
	/// JSON body, if any.
	pub body: Option<JsonValue>,
	/// Query parameters appended in order.
	pub query: Vec<(String, String)>,
	/// Values for the `:name` placeholders in `url`.
	pub path_vars: Option<PathVariables>,
	/// Skip the bearer credential and the refresh protocol.
	pub ignore_auth: bool,
	/// Suppress the user-facing error notification.
	pub silent_error: bool,
	/// Return failures as `Err` instead of a failure envelope.
	pub throw_error: bool,
}
impl RequestDescriptor {
	/// Creates a descriptor for `method` against the URL template.
	pub fn new(method: Method, url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			method,
			headers: HeaderMap::new(),
			body: None,
			query: Vec::new(),
			path_vars: None,
			ignore_auth: false,
			silent_error: false,
			throw_error: false,
		}
	}

	/// `GET` descriptor.
	pub fn get(url: impl Into<String>) -> Self {
		Self::new(Method::GET, url)
	}

	/// `POST` descriptor.
	pub fn post(url: impl Into<String>) -> Self {
		Self::new(Method::POST, url)
	}

	/// `PUT` descriptor.
	pub fn put(url: impl Into<String>) -> Self {
		Self::new(Method::PUT, url)
	}

	/// `PATCH` descriptor.
	pub fn patch(url: impl Into<String>) -> Self {
		Self::new(Method::PATCH, url)
	}

	/// `DELETE` descriptor.
	pub fn delete(url: impl Into<String>) -> Self {
		Self::new(Method::DELETE, url)
	}

	/// Adds a header, replacing any previous value for the same name.
	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets a raw JSON body.
	pub fn json_value(mut self, body: JsonValue) -> Self {
		self.body = Some(body);

		self
	}

	/// Serializes `body` and sets it as the JSON body.
	pub fn json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_value(body).map_err(ConfigError::BodySerialization)?);

		Ok(self)
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.query.push((name.into(), value.to_string()));

		self
	}

	/// Sets a single path variable, creating the map if needed.
	pub fn path_var(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.path_vars.get_or_insert_with(PathVariables::new).insert(name, value);

		self
	}

	/// Replaces the whole path-variable map.
	pub fn path_vars(mut self, vars: PathVariables) -> Self {
		self.path_vars = Some(vars);

		self
	}

	/// Skips credential attachment and the refresh protocol.
	pub fn ignore_auth(mut self) -> Self {
		self.ignore_auth = true;

		self
	}

	/// Suppresses the user-facing error notification.
	pub fn silent_error(mut self) -> Self {
		self.silent_error = true;

		self
	}

	/// Returns failures as `Err` instead of a failure envelope.
	pub fn throw_error(mut self) -> Self {
		self.throw_error = true;

		self
	}
}
