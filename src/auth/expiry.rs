//! Expiry predicates consulted after an authorization failure.
//!
//! Both comparisons are strict: a token is still usable at the exact instant it expires. The
//! predicates are only used to decide refresh eligibility once the server has already answered
//! 401; requests are never held back because a stored token looks stale.

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Returns `true` if `now` is past the access expiry or past the refresh expiry.
pub fn is_access_or_refresh_expired(token: &TokenRecord, now: OffsetDateTime) -> bool {
	now > token.access_expired_at || now > token.refresh_expired_at
}

/// Returns `true` if `now` is past the refresh expiry.
pub fn is_refresh_expired(token: &TokenRecord, now: OffsetDateTime) -> bool {
	now > token.refresh_expired_at
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	fn token() -> TokenRecord {
		TokenRecord::new(
			"a",
			"r",
			macros::datetime!(2025-01-01 01:00 UTC),
			macros::datetime!(2025-01-02 00:00 UTC),
		)
	}

	#[test]
	fn boundaries_are_strict() {
		let token = token();

		assert!(!is_access_or_refresh_expired(&token, token.access_expired_at));
		assert!(is_access_or_refresh_expired(
			&token,
			token.access_expired_at + Duration::milliseconds(1)
		));
		assert!(!is_refresh_expired(&token, token.refresh_expired_at));
		assert!(is_refresh_expired(&token, token.refresh_expired_at + Duration::milliseconds(1)));
	}

	#[test]
	fn access_lapse_alone_is_refreshable() {
		let token = token();
		let now = macros::datetime!(2025-01-01 12:00 UTC);

		assert!(is_access_or_refresh_expired(&token, now));
		assert!(!is_refresh_expired(&token, now));
	}

	#[test]
	fn refresh_lapse_counts_even_when_access_is_still_valid() {
		let token = TokenRecord::new(
			"a",
			"r",
			macros::datetime!(2025-02-01 00:00 UTC),
			macros::datetime!(2025-01-01 00:00 UTC),
		);
		let now = macros::datetime!(2025-01-15 00:00 UTC);

		assert!(is_access_or_refresh_expired(&token, now));
		assert!(is_refresh_expired(&token, now));
		assert!(token.is_refresh_expired_at(now));
	}
}
