use crate::{config::Config, error, info, spotify::auth, warning};

/// Prints the authorization URL and opens it in the default browser.
///
/// The redirect lands on `GET /api/auth/callback`, so `monthlify serve` has
/// to be running (or the front-end has to proxy to it) for the login to
/// complete.
pub async fn login() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot build authorization URL. Err: {}", e),
    };

    let auth_url = match auth::authorize_url(&config) {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    info!("Authorize Monthlify at:\n{}", auth_url);
    info!("Spotify redirects to {}", config.redirect_uri);

    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please navigate to the URL above manually");
    }
}
