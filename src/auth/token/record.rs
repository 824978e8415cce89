//! Persisted access/refresh token pair with their expiry instants.

// crates.io
use http::HeaderValue;
// self
use crate::{_prelude::*, auth::expiry, auth::token::secret::TokenSecret};

/// Token pair issued by the login or refresh endpoint.
///
/// The wire form is the JSON object `{access, refresh, accessExpiredAt, refreshExpiredAt}` with
/// both instants encoded as Unix epoch milliseconds. `refresh_expired_at >= access_expired_at`
/// is expected but never enforced.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
	/// Access token sent as the bearer credential; callers must avoid logging it.
	pub access: TokenSecret,
	/// Refresh token used only to obtain a new record.
	pub refresh: TokenSecret,
	/// Instant after which the access token is considered lapsed.
	#[serde(with = "epoch_millis")]
	pub access_expired_at: OffsetDateTime,
	/// Instant after which the refresh token is considered lapsed.
	#[serde(with = "epoch_millis")]
	pub refresh_expired_at: OffsetDateTime,
}
impl TokenRecord {
	/// Creates a record from raw secrets and expiry instants.
	pub fn new(
		access: impl Into<String>,
		refresh: impl Into<String>,
		access_expired_at: OffsetDateTime,
		refresh_expired_at: OffsetDateTime,
	) -> Self {
		Self {
			access: TokenSecret::new(access),
			refresh: TokenSecret::new(refresh),
			access_expired_at,
			refresh_expired_at,
		}
	}

	/// Builds the `Authorization: Bearer <access>` header value, flagged as sensitive.
	pub fn bearer_header(&self) -> Result<HeaderValue, http::header::InvalidHeaderValue> {
		let mut value = HeaderValue::from_str(&format!("Bearer {}", self.access.expose()))?;

		value.set_sensitive(true);

		Ok(value)
	}

	/// Returns `true` if either token has lapsed at the provided instant.
	pub fn is_access_or_refresh_expired_at(&self, instant: OffsetDateTime) -> bool {
		expiry::is_access_or_refresh_expired(self, instant)
	}

	/// Returns `true` if the refresh token has lapsed at the provided instant.
	pub fn is_refresh_expired_at(&self, instant: OffsetDateTime) -> bool {
		expiry::is_refresh_expired(self, instant)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenRecord")
			.field("access", &"<redacted>")
			.field("refresh", &"<redacted>")
			.field("access_expired_at", &self.access_expired_at)
			.field("refresh_expired_at", &self.refresh_expired_at)
			.finish()
	}
}

mod epoch_millis {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as _};
	// self
	use crate::_prelude::*;

	const NANOS_PER_MILLI: i128 = 1_000_000;

	pub fn serialize<S>(instant: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let millis = instant.unix_timestamp_nanos() / NANOS_PER_MILLI;

		serializer.serialize_i64(millis as i64)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI)
			.map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn fixture() -> TokenRecord {
		TokenRecord::new(
			"access",
			"refresh",
			macros::datetime!(2025-01-01 01:00 UTC),
			macros::datetime!(2025-01-08 00:00 UTC),
		)
	}

	#[test]
	fn wire_form_uses_camel_case_and_epoch_millis() {
		let value = serde_json::to_value(fixture()).expect("Record should serialize to JSON.");

		assert_eq!(
			value,
			serde_json::json!({
				"access": "access",
				"refresh": "refresh",
				"accessExpiredAt": 1_735_693_200_000_i64,
				"refreshExpiredAt": 1_736_294_400_000_i64,
			})
		);

		let parsed: TokenRecord =
			serde_json::from_value(value).expect("Record should deserialize from its wire form.");

		assert_eq!(parsed, fixture());
	}

	#[test]
	fn bearer_header_is_sensitive() {
		let header = fixture().bearer_header().expect("Header should encode.");

		assert_eq!(header.to_str().expect("Header should be ASCII."), "Bearer access");
		assert!(header.is_sensitive());
	}

	#[test]
	fn bearer_header_rejects_control_characters() {
		let mut record = fixture();

		record.access = TokenSecret::new("bad\ntoken");

		assert!(record.bearer_header().is_err());
	}

	#[test]
	fn debug_redacts_secrets() {
		let rendered = format!("{:?}", fixture());

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("\"access\""));
	}
}
