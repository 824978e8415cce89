//! Demonstrates a request whose access token has lapsed: the client sees the 401, refreshes
//! through the token endpoint, persists the new record to a JSON file, and retries once.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use url::Url;
// self
use authed_http::{
	auth::TokenRecord,
	client::ReqwestApiClient,
	config::ClientConfig,
	refresh::RefreshOutcome,
	request::RequestDescriptor,
	store::{FileStore, TokenStore},
};

#[derive(Debug, Deserialize)]
struct Profile {
	id: u64,
	name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let now = OffsetDateTime::now_utc();
	let renewed = TokenRecord::new(
		"demo-access-2",
		"demo-refresh-2",
		now + Duration::hours(1),
		now + Duration::days(7),
	);
	let refresh_body = serde_json::to_string(&RefreshOutcome::issued(renewed))?;
	let stale_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/7").header("authorization", "Bearer demo-access-1");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"success\":false,\"message\":\"Token expired\"}");
		})
		.await;
	let refresh_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/refresh");
			then.status(200).header("content-type", "application/json").body(refresh_body);
		})
		.await;
	let fresh_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/users/7").header("authorization", "Bearer demo-access-2");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"success\":true,\"data\":{\"id\":7,\"name\":\"Ada\"}}");
		})
		.await;
	let path = std::env::temp_dir().join("authed-http-demo-token.json");
	let store = TokenStore::new(Arc::new(FileStore::open(&path)?));

	store.set(&TokenRecord::new(
		"demo-access-1",
		"demo-refresh-1",
		now - Duration::minutes(1),
		now + Duration::days(7),
	))?;

	let config = ClientConfig::builder().base_url(Url::parse(&server.base_url())?).build()?;
	let client = ReqwestApiClient::new(config, store.clone(), "/auth/refresh")?
		.with_notifier(Arc::new(|message: &str| eprintln!("Notice: {message}")));
	let response = client
		.request::<Profile>(RequestDescriptor::get("/api/users/:id").path_var("id", 7))
		.await?;

	if let Some(profile) = response.data() {
		println!("Fetched profile #{} ({}).", profile.id, profile.name);
	}

	println!("Token file now holds the renewed record: {}.", path.display());

	stale_mock.assert_async().await;
	refresh_mock.assert_async().await;
	fresh_mock.assert_async().await;
	store.delete()?;

	Ok(())
}
