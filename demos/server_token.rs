//! Issues a server token against a local mock of the SPID endpoints, calls a resource with it,
//! and lets the client refresh an expired handle before the next call.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use spid_client::{
	auth::{SpidToken, TokenHandle, TokenType},
	client::ReqwestSpidClient,
	config::SpidConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"expires_in\":900,\"refresh_token\":\"demo-refresh\"}",
			);
		})
		.await;
	let resource_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/2/me").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"name\":\"SPP Container\",\"data\":{\"userId\":\"42\"}}");
		})
		.await;
	let config = SpidConfig::builder(
		"demo-client",
		"demo-secret",
		"demo-sign-secret",
		"https://app.example.com/callback",
		server.base_url(),
	)
	.build()?;
	let client = ReqwestSpidClient::new(config);
	let handle = TokenHandle::new(client.server_token().await?);

	println!("Server token expires at {}.", handle.expires_at());

	let response = client.get(&handle, "/me", &[]).await?;

	println!("GET /me answered {} with data {:?}.", response.status(), response.data());

	let stale = TokenHandle::new(SpidToken::new(
		"stale-access",
		-1,
		Some("demo-refresh".into()),
		TokenType::Client,
	));
	let response = client.get(&stale, "/me", &[]).await?;

	println!("Expired handle was refreshed; GET /me answered {}.", response.status());
	println!("Refresh counters: {:?}.", client.refresh_metrics.snapshot());

	token_mock.assert_calls_async(2).await;
	resource_mock.assert_calls_async(2).await;

	Ok(())
}
