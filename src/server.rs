use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use reqwest::Client;
use tower_http::cors::CorsLayer;

use crate::{Error, Res, api, config::Config, info, spotify::SpotifyClient};

/// State shared by every handler: the startup configuration and one pooled
/// HTTP client for all upstream calls.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            http: Client::new(),
        }
    }

    /// Spotify client acting on behalf of the caller's access token.
    pub fn spotify(&self, access_token: &str) -> SpotifyClient {
        SpotifyClient::new(self.http.clone(), &self.config.api_url, access_token)
    }
}

/// Builds the application router without transport layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::welcome))
        .route("/health", get(api::health))
        .route("/api/auth/login", get(api::login))
        .route("/api/auth/callback", get(api::callback))
        .route("/api/auth/refresh", post(api::refresh))
        .route("/api/auth/logout", post(api::logout))
        .route("/api/spotify/playlists", get(api::playlists))
        .route("/api/spotify/user", get(api::user))
        .route("/api/preview", get(api::preview))
        .route(
            "/api/create-monthly-playlists",
            post(api::create_monthly_playlists),
        )
        .route("/api/images/cover/{month}/{year}", get(api::cover))
        .with_state(state)
}

/// CORS policy for the browser front-end. Cookies travel with every call,
/// so the origin must be explicit and credentials allowed.
pub fn cors_layer(frontend_origin: &str) -> Res<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_origin)
        .map_err(|e| Error::Unexpected(format!("invalid FRONTEND_ORIGIN: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| Error::Unexpected(format!("failed to parse server address: {}", e)))?;

    let cors = cors_layer(&config.frontend_origin)?;
    let app = router(AppState::new(config)).layer(cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Unexpected(format!("failed to bind {}: {}", addr, e)))?;

    info!("Monthlify listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Unexpected(format!("server stopped: {}", e)))
}
