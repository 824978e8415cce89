//! HTTP transport seam used for API calls and token refreshes.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. Implementations report
//! every HTTP response, whatever its status, as `Ok`; `Err` is reserved for failures where no
//! response was received (DNS, TCP, TLS, timeouts), mapped into
//! [`TransportError`](crate::error::TransportError). Status interpretation belongs to the
//! client.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use http::{HeaderMap, HeaderValue, Method};
#[cfg(feature = "reqwest")] use http::header::CONTENT_TYPE;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::TransportError;

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<TransportResponse>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one fully resolved request.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared by the
/// client and its refresher behind an `Arc`.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request` and returns the decoded response.
	fn send(&self, request: TransportRequest) -> TransportFuture<'_>;
}

/// Fully resolved request handed to the transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL with path variables already substituted.
	pub url: Url,
	/// Query parameters to append to `url`.
	pub query: Vec<(String, String)>,
	/// Request headers, including the bearer credential when attached.
	pub headers: HeaderMap,
	/// JSON body, if any.
	pub body: Option<JsonValue>,
}
impl TransportRequest {
	/// `url` with `query` appended, as it goes on the wire.
	pub fn full_url(&self) -> Url {
		let mut url = self.url.clone();

		if !self.query.is_empty() {
			url.query_pairs_mut().extend_pairs(self.query.iter());
		}

		url
	}

	/// Serialized body bytes together with the content type to send them with.
	pub fn body_bytes(&self) -> Result<Option<(HeaderValue, Vec<u8>)>> {
		let Some(body) = self.body.as_ref() else {
			return Ok(None);
		};
		let bytes = serde_json::to_vec(body).map_err(crate::error::ConfigError::BodySerialization)?;

		Ok(Some((HeaderValue::from_static("application/json"), bytes)))
	}
}

/// HTTP response as seen by the client.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
	/// HTTP status code.
	pub status: u16,
	/// Decoded body; `Null` when empty, a JSON string when the body is not JSON.
	pub body: JsonValue,
}
impl TransportResponse {
	/// Decodes raw body bytes following the [`TransportResponse::body`] rules.
	pub fn from_bytes(status: u16, bytes: &[u8]) -> Self {
		let body = if bytes.is_empty() {
			JsonValue::Null
		} else {
			serde_json::from_slice(bytes)
				.unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(bytes).into_owned()))
		};

		Self { status, body }
	}

	/// Server-provided message: the body's `message`, falling back to `errorMessage`.
	pub fn server_message(&self) -> Option<String> {
		["message", "errorMessage"]
			.into_iter()
			.find_map(|field| self.body.get(field).and_then(JsonValue::as_str))
			.map(str::to_owned)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts, proxies, and TLS settings come from the wrapped client.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: TransportRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let url = request.full_url();
			let mut builder = client.request(request.method.clone(), url.clone());
			let mut headers = request.headers.clone();

			if let Some((content_type, bytes)) = request.body_bytes()? {
				headers.entry(CONTENT_TYPE).or_insert(content_type);
				builder = builder.body(bytes);
			}

			let response = builder
				.headers(headers)
				.send()
				.await
				.map_err(|e| TransportError::network(&url, e))?;
			let status = response.status().as_u16();
			let bytes = response.bytes().await.map_err(|e| TransportError::network(&url, e))?;

			Ok(TransportResponse::from_bytes(status, &bytes))
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn full_url_appends_query_in_order() {
		let request = TransportRequest {
			method: Method::GET,
			url: Url::parse("https://api.example.com/items/1")
				.expect("Fixture URL should parse."),
			query: vec![("page".into(), "2".into()), ("q".into(), "a b".into())],
			headers: HeaderMap::new(),
			body: None,
		};

		assert_eq!(request.full_url().as_str(), "https://api.example.com/items/1?page=2&q=a+b");
	}

	#[test]
	fn body_decoding_tolerates_empty_and_plain_text() {
		assert_eq!(TransportResponse::from_bytes(204, b"").body, JsonValue::Null);
		assert_eq!(
			TransportResponse::from_bytes(502, b"Bad Gateway").body,
			JsonValue::String("Bad Gateway".into())
		);
		assert_eq!(
			TransportResponse::from_bytes(200, br#"{"data":[1]}"#).body,
			serde_json::json!({ "data": [1] })
		);
	}

	#[test]
	fn server_message_prefers_message_field() {
		let response = TransportResponse {
			status: 400,
			body: serde_json::json!({ "message": "Bad input", "errorMessage": "ignored" }),
		};

		assert_eq!(response.server_message().as_deref(), Some("Bad input"));

		let fallback =
			TransportResponse { status: 400, body: serde_json::json!({ "errorMessage": "Nope" }) };

		assert_eq!(fallback.server_message().as_deref(), Some("Nope"));
		assert_eq!(TransportResponse::from_bytes(500, b"oops").server_message(), None);
	}
}
