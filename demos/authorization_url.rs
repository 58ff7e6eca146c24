//! Prints the URLs a web application hands to the browser: the authorization URL that starts
//! the user login, and the logout URL that ends the provider session.

// crates.io
use color_eyre::Result;
// self
use spid_client::{
	auth::{SpidToken, TokenType},
	client::ReqwestSpidClient,
	config::SpidConfig,
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let config = SpidConfig::builder(
		"demo-client",
		"demo-secret",
		"demo-sign-secret",
		"https://app.example.com/callback",
		"https://login.schibsted.com",
	)
	.build()?;
	let client = ReqwestSpidClient::new(config);

	println!("Send your user to {}.", client.authorization_url(&client.config.redirect_uri));
	println!(
		"Call SpidClient::user_token with the `code` SPID appends to {}.",
		client.config.redirect_uri
	);

	let user_token = SpidToken::new("user-access", 3600, None, TokenType::User);

	println!(
		"Log the user out via {}.",
		client.logout_url(&user_token, "https://app.example.com/goodbye")
	);

	Ok(())
}
