use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, header::AUTHORIZATION};
use url::Url;

use crate::{
    Error, Res,
    config::Config,
    types::{Token, TokenErrorResponse},
};

/// Builds the Spotify authorization URL the user is sent to for login.
///
/// The URL requests an authorization code (`response_type=code`) for the
/// configured client, scopes and redirect URI. After the user grants access,
/// Spotify redirects back to the redirect URI with a `code` query parameter
/// that [`exchange_code`] turns into tokens.
///
/// # Errors
///
/// Returns `Unexpected` if the configured authorization URL is not a valid
/// URL.
///
/// # Example
///
/// ```ignore
/// let url = authorize_url(&config)?;
/// // https://accounts.spotify.com/authorize?response_type=code&client_id=...
/// ```
pub fn authorize_url(config: &Config) -> Res<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("scope", config.scope.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .map_err(|e| Error::Unexpected(format!("invalid authorization url: {}", e)))?;

    Ok(url.to_string())
}

/// `Authorization` header value carrying the client credentials.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", client_id, client_secret))
    )
}

/// Exchanges an authorization code for an access token and a refresh token.
///
/// Completes the authorization-code flow started by [`authorize_url`]. The
/// request authenticates the application with HTTP Basic client credentials,
/// so the client secret never leaves the server.
///
/// # Arguments
///
/// * `http` - Shared HTTP client
/// * `config` - Client credentials, redirect URI and token endpoint
/// * `code` - Authorization code received on the callback
///
/// # Errors
///
/// Returns `Upstream` with the accounts service's `error_description` when
/// the code is invalid, expired or already used, or when the credentials are
/// rejected.
pub async fn exchange_code(http: &Client, config: &Config, code: &str) -> Res<Token> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when the response omits
/// it, the returned [`Token`] has `refresh_token: None` and the caller keeps
/// using the old one.
pub async fn refresh_token(http: &Client, config: &Config, refresh_token: &str) -> Res<Token> {
    request_token(
        http,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(http: &Client, config: &Config, form: &[(&str, &str)]) -> Res<Token> {
    let response = http
        .post(&config.token_url)
        .header(
            AUTHORIZATION,
            basic_credentials(&config.client_id, &config.client_secret),
        )
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<TokenErrorResponse>(&body)
            .map(|e| e.error_description.unwrap_or(e.error))
            .unwrap_or_else(|_| format!("token request failed with status {}", status));
        return Err(Error::upstream(Some(status.as_u16()), message));
    }

    serde_json::from_str::<Token>(&body)
        .map_err(|e| Error::upstream(None, format!("malformed token response: {}", e)))
}
