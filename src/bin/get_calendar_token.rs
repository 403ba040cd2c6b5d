use matchsync::components::google_calendar::token::{save_token, TokenResponse, GOOGLE_TOKEN_URL};
use matchsync::config::Config;
use matchsync::error::{network_error, other_error, SyncResult};
use url::Url;

const REDIRECT_URI: &str = "http://localhost:8080";
const SCOPES: &str = "https://www.googleapis.com/auth/calendar.readonly https://www.googleapis.com/auth/calendar.events";

#[tokio::main]
async fn main() -> miette::Result<()> {
    Ok(run().await?)
}

async fn run() -> SyncResult<()> {
    // Load configuration
    let config = Config::load()?;

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse("https://accounts.google.com/o/oauth2/v2/auth")
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &config.google_client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", SCOPES)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser, visit this URL instead:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http("127.0.0.1:8080")
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))
        .map_err(|e| other_error(&format!("Invalid callback URL: {}", e)))?;
    let param = |name: &str| {
        callback
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if param("state").as_deref() != Some(state.as_str()) {
        return Err(other_error("State mismatch in authorization callback"));
    }
    let code = param("code").ok_or_else(|| other_error("No authorization code found in callback"))?;

    // Exchange code for tokens
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .map_err(|e| network_error(&format!("Failed to build HTTP client: {}", e)))?;

    let response = client
        .post(GOOGLE_TOKEN_URL)
        .form(&[
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| network_error(&format!("Failed to get token: {}", e)))?;

    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: TokenResponse = response
        .json()
        .await
        .map_err(|e| other_error(&format!("Failed to parse token response: {}", e)))?;

    // Save token to the cache file
    save_token(&config.token_path, &token_data.into_stored(None))?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token successfully saved to {}!", config.token_path.display());

    Ok(())
}
