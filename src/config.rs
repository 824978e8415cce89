//! Client configuration and its validating builder.

// self
use crate::{_prelude::*, error::ConfigError};

/// Message shown when a failure carries no server-provided message.
pub const DEFAULT_ERROR_MESSAGE: &str = "Request failed, please try again later.";

/// How concurrent refresh attempts relate to each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshCoordination {
	/// Every request that hits an expired token refreshes on its own; N concurrent 401s issue N
	/// refresh calls and the last stored record wins.
	#[default]
	Independent,
	/// Refreshes are serialized; a request that waited on another task's refresh reuses the
	/// record that task stored instead of refreshing again.
	SingleFlight,
}

/// Errors raised while building a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ClientConfigError {
	/// Base URL is mandatory.
	#[error("Missing base URL.")]
	MissingBaseUrl,
	/// Base URL must be able to carry a path.
	#[error("Base URL cannot carry a path: {url}.")]
	CannotBeABase {
		/// Base URL that failed validation.
		url: String,
	},
	/// Base URL must use HTTP or HTTPS.
	#[error("Base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Base URL that failed validation.
		url: String,
	},
	/// The fallback message must not be blank.
	#[error("Default error message must not be empty.")]
	EmptyDefaultErrorMessage,
}

/// Validated settings shared by every request a client issues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Base URL relative request paths are appended to.
	pub base_url: Url,
	/// Upper bound on refresh-and-retry rounds per request.
	pub max_auth_retries: u8,
	/// Notification text used when a failure carries no message of its own.
	pub default_error_message: String,
	/// Refresh coordination mode.
	pub refresh_coordination: RefreshCoordination,
}
impl ClientConfig {
	/// Default bound on refresh-and-retry rounds.
	pub const DEFAULT_MAX_AUTH_RETRIES: u8 = 1;

	/// Returns a builder seeded with defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Resolves a substituted request path into an absolute URL.
	///
	/// Absolute URLs pass through unchanged. Relative paths are appended to the base URL with
	/// exactly one `/` between them, so a base of `https://host/api/` and a path of `/users`
	/// yield `https://host/api/users`.
	pub fn resolve(&self, path: &str) -> Result<Url, ConfigError> {
		if let Ok(url) = Url::parse(path) {
			return Ok(url);
		}

		let base = self.base_url.as_str().trim_end_matches('/');
		let joined = match path.trim_start_matches('/') {
			"" => base.to_owned(),
			relative => format!("{base}/{relative}"),
		};

		Url::parse(&joined)
			.map_err(|source| ConfigError::InvalidRequestUrl { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Base URL; required.
	pub base_url: Option<Url>,
	/// Upper bound on refresh-and-retry rounds.
	pub max_auth_retries: u8,
	/// Fallback notification text.
	pub default_error_message: String,
	/// Refresh coordination mode.
	pub refresh_coordination: RefreshCoordination,
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self {
			base_url: None,
			max_auth_retries: ClientConfig::DEFAULT_MAX_AUTH_RETRIES,
			default_error_message: DEFAULT_ERROR_MESSAGE.into(),
			refresh_coordination: RefreshCoordination::default(),
		}
	}
}
impl ClientConfigBuilder {
	/// Sets the base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the refresh-and-retry bound; `0` disables refreshing altogether.
	pub fn max_auth_retries(mut self, retries: u8) -> Self {
		self.max_auth_retries = retries;

		self
	}

	/// Overrides the fallback notification text.
	pub fn default_error_message(mut self, message: impl Into<String>) -> Self {
		self.default_error_message = message.into();

		self
	}

	/// Overrides the refresh coordination mode.
	pub fn refresh_coordination(mut self, mode: RefreshCoordination) -> Self {
		self.refresh_coordination = mode;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ClientConfigError> {
		let base_url = self.base_url.ok_or(ClientConfigError::MissingBaseUrl)?;

		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ClientConfigError::UnsupportedScheme { url: base_url.to_string() });
		}
		if base_url.cannot_be_a_base() {
			return Err(ClientConfigError::CannotBeABase { url: base_url.to_string() });
		}
		if self.default_error_message.trim().is_empty() {
			return Err(ClientConfigError::EmptyDefaultErrorMessage);
		}

		Ok(ClientConfig {
			base_url,
			max_auth_retries: self.max_auth_retries,
			default_error_message: self.default_error_message,
			refresh_coordination: self.refresh_coordination,
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	fn config(base: &str) -> ClientConfig {
		ClientConfig::builder().base_url(url(base)).build().expect("Config should build.")
	}

	#[test]
	fn builder_applies_defaults() {
		let config = config("https://api.example.com");

		assert_eq!(config.max_auth_retries, 1);
		assert_eq!(config.default_error_message, DEFAULT_ERROR_MESSAGE);
		assert_eq!(config.refresh_coordination, RefreshCoordination::Independent);
	}

	#[test]
	fn builder_rejects_invalid_settings() {
		assert_eq!(ClientConfig::builder().build(), Err(ClientConfigError::MissingBaseUrl));
		assert!(matches!(
			ClientConfig::builder().base_url(url("ftp://files.example.com")).build(),
			Err(ClientConfigError::UnsupportedScheme { .. })
		));
		assert_eq!(
			ClientConfig::builder()
				.base_url(url("https://api.example.com"))
				.default_error_message("  ")
				.build(),
			Err(ClientConfigError::EmptyDefaultErrorMessage)
		);
	}

	#[test]
	fn resolve_joins_with_a_single_slash() {
		let with_prefix = config("https://api.example.com/v1/");

		assert_eq!(
			with_prefix.resolve("/users/1").expect("Path should resolve.").as_str(),
			"https://api.example.com/v1/users/1"
		);
		assert_eq!(
			with_prefix.resolve("users").expect("Path should resolve.").as_str(),
			"https://api.example.com/v1/users"
		);
		assert_eq!(
			config("https://api.example.com").resolve("/health").expect("Path should resolve.").as_str(),
			"https://api.example.com/health"
		);
	}

	#[test]
	fn resolve_passes_absolute_urls_through() {
		let config = config("https://api.example.com");

		assert_eq!(
			config.resolve("https://auth.example.com/refresh").expect("URL should resolve.").as_str(),
			"https://auth.example.com/refresh"
		);
	}
}
