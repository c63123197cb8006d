use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use monthlify::{
    Error,
    config::Config,
    server::{AppState, router},
    spotify::auth::basic_credentials,
};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Minimal stand-in for the Spotify Web API and accounts service.
#[derive(Clone)]
struct MockSpotify {
    base: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl MockSpotify {
    fn record(&self, event: String) {
        self.log.lock().unwrap().push(event);
    }
}

fn item(added_at: &str, uri: &str) -> Value {
    json!({
        "added_at": added_at,
        "track": {
            "uri": uri,
            "name": format!("Song {}", uri),
            "artists": [{ "name": "Artist A" }, { "name": "Artist B" }]
        }
    })
}

async fn me() -> Json<Value> {
    Json(json!({ "id": "user-1", "display_name": "Test User", "images": [] }))
}

async fn saved_tracks(
    State(mock): State<MockSpotify>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    if query.get("page").map(String::as_str) == Some("2") {
        return Json(json!({
            "items": [item("2024-03-01T00:00:00Z", "spotify:track:3")],
            "next": null,
            "total": 3
        }));
    }
    Json(json!({
        "items": [
            item("2024-02-01T00:00:00Z", "spotify:track:1"),
            item("2024-02-15T00:00:00Z", "spotify:track:2")
        ],
        "next": format!("{}/v1/me/tracks?page=2", mock.base),
        "total": 3
    }))
}

async fn my_playlists() -> Json<Value> {
    Json(json!({
        "items": [{
            "id": "feb",
            "name": "February 2024",
            "owner": { "id": "user-1", "display_name": "Test User" },
            "tracks": { "total": 1 },
            "images": null,
            "external_urls": { "spotify": "https://open.spotify.com/playlist/feb" }
        }, null],
        "next": null,
        "total": 2
    }))
}

async fn playlist_tracks(Path(id): Path<String>) -> impl IntoResponse {
    if id == "feb" {
        return (
            StatusCode::OK,
            Json(json!({
                "items": [item("2024-02-01T00:00:00Z", "spotify:track:1")],
                "next": null,
                "total": 1
            })),
        );
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": { "status": 404, "message": "Resource not found" } })),
    )
}

async fn create_playlist(
    State(mock): State<MockSpotify>,
    Path(user): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    mock.record(format!("create {} {} public={}", user, name, body["public"]));
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "new-1",
            "name": name,
            "description": body["description"],
            "external_urls": { "spotify": "https://open.spotify.com/playlist/new-1" }
        })),
    )
}

async fn add_tracks(
    State(mock): State<MockSpotify>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let uris: Vec<&str> = body["uris"]
        .as_array()
        .map(|a| a.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    mock.record(format!("add {} {}", id, uris.join(",")));
    (StatusCode::CREATED, Json(json!({ "snapshot_id": "snap" })))
}

async fn update_playlist(
    State(mock): State<MockSpotify>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    mock.record(format!(
        "describe {} {}",
        id,
        body["description"].as_str().unwrap_or_default()
    ));
    StatusCode::OK
}

async fn upload_image(
    State(mock): State<MockSpotify>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let jpeg = STANDARD.decode(body.as_bytes()).unwrap_or_default();
    let is_jpeg = jpeg.starts_with(&[0xFF, 0xD8]);
    mock.record(format!("cover {} {} jpeg={}", id, content_type, is_jpeg));
    StatusCode::ACCEPTED
}

async fn token(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(basic_credentials("client-id", "client-secret").as_str());
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid_client", "error_description": "Invalid client" })),
        );
    }

    let grant = form.get("grant_type").map(String::as_str);
    match grant {
        Some("authorization_code") if form.get("code").map(String::as_str) == Some("good") => (
            StatusCode::OK,
            Json(json!({
                "access_token": "a1",
                "refresh_token": "r1",
                "token_type": "Bearer",
                "scope": "user-library-read",
                "expires_in": 3600
            })),
        ),
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("r1") => (
            StatusCode::OK,
            Json(json!({ "access_token": "a2", "token_type": "Bearer", "expires_in": 1800 })),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid authorization code" })),
        ),
    }
}

async fn spawn_mock() -> MockSpotify {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mock = MockSpotify {
        base: format!("http://{}", listener.local_addr().unwrap()),
        log: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/v1/me", get(me))
        .route("/v1/me/tracks", get(saved_tracks))
        .route("/v1/me/playlists", get(my_playlists))
        .route(
            "/v1/playlists/{id}/tracks",
            get(playlist_tracks).post(add_tracks),
        )
        .route("/v1/playlists/{id}", put(update_playlist))
        .route("/v1/playlists/{id}/images", put(upload_image))
        .route("/v1/users/{user}/playlists", post(create_playlist))
        .route("/api/token", post(token))
        .with_state(mock.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    mock
}

fn app(mock: &MockSpotify) -> Router {
    let api_url = format!("{}/v1", mock.base);
    let token_url = format!("{}/api/token", mock.base);
    let config = Config::from_lookup(|key| match key {
        "SPOTIFY_CLIENT_ID" => Some("client-id".to_string()),
        "SPOTIFY_CLIENT_SECRET" => Some("client-secret".to_string()),
        "SPOTIFY_REDIRECT_URI" => Some("http://127.0.0.1:3000/api/auth/callback".to_string()),
        "SPOTIFY_API_URL" => Some(api_url.clone()),
        "SPOTIFY_TOKEN_URL" => Some(token_url.clone()),
        _ => None,
    })
    .unwrap();
    router(AppState::new(config))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    (status, headers, body)
}

fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

fn set_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn get_with_token(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, "Bearer a1")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_welcome_and_health() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(app(&mock), Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["message"], "Welcome to the Monthlify API!");

    let (status, _, body) =
        send(app(&mock), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["status"], "ok");
}

#[tokio::test]
async fn test_login_returns_authorize_url() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        Request::get("/api/auth/login").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let auth_url = json_body(&body)["auth_url"].as_str().unwrap().to_string();
    assert!(auth_url.starts_with("https://accounts.spotify.com/authorize?"));
    assert!(auth_url.contains("client_id=client-id"));
    assert!(auth_url.contains("response_type=code"));
}

#[tokio::test]
async fn test_callback_without_code_is_unauthorized() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        Request::get("/api/auth/callback").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body)["error"], "no authorization code provided");

    let (status, _, body) = send(
        app(&mock),
        Request::get("/api/auth/callback?error=access_denied")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(&body)["error"], "access_denied");
}

#[tokio::test]
async fn test_callback_sets_token_cookies() {
    let mock = spawn_mock().await;

    let (status, headers, _) = send(
        app(&mock),
        Request::get("/api/auth/callback?code=good")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "http://127.0.0.1:3001");

    let cookies = set_cookies(&headers);
    let access = cookies
        .iter()
        .find(|c| c.starts_with("spotify_access_token=a1"))
        .unwrap();
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("Max-Age=3600"));

    let refresh = cookies
        .iter()
        .find(|c| c.starts_with("spotify_refresh_token=r1"))
        .unwrap();
    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Max-Age=2592000"));
}

#[tokio::test]
async fn test_callback_with_rejected_code_reports_upstream_error() {
    let mock = spawn_mock().await;

    let (status, headers, body) = send(
        app(&mock),
        Request::get("/api/auth/callback?code=stale")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body)["error"], "Invalid authorization code");
    assert!(set_cookies(&headers).is_empty());
}

#[tokio::test]
async fn test_refresh_replaces_access_cookie() {
    let mock = spawn_mock().await;

    let (status, _, _) = send(
        app(&mock),
        Request::post("/api/auth/refresh").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, headers, body) = send(
        app(&mock),
        Request::post("/api/auth/refresh")
            .header(header::COOKIE, "spotify_refresh_token=r1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["expires_in"], 1800);

    let cookies = set_cookies(&headers);
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].starts_with("spotify_access_token=a2"));
    assert!(cookies[0].contains("Max-Age=1800"));
}

#[tokio::test]
async fn test_logout_clears_both_cookies() {
    let mock = spawn_mock().await;

    let (status, headers, _) = send(
        app(&mock),
        Request::post("/api/auth/logout")
            .header(
                header::COOKIE,
                "spotify_access_token=a1; spotify_refresh_token=r1",
            )
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let cookies = set_cookies(&headers);
    for name in ["spotify_access_token=", "spotify_refresh_token="] {
        let cookie = cookies.iter().find(|c| c.starts_with(name)).unwrap();
        assert!(cookie.contains("Max-Age=0"), "{}", cookie);
        assert!(cookie.contains("Path=/"), "{}", cookie);
    }
}

#[tokio::test]
async fn test_endpoints_require_access_token() {
    let mock = spawn_mock().await;

    for uri in [
        "/api/spotify/user",
        "/api/spotify/playlists",
        "/api/preview?identifier=liked-songs",
    ] {
        let (status, _, body) =
            send(app(&mock), Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert!(json_body(&body)["error"].is_string());
    }
}

#[tokio::test]
async fn test_user_profile_with_cookie() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        Request::get("/api/spotify/user")
            .header(header::COOKIE, "spotify_access_token=a1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let profile = json_body(&body);
    assert_eq!(profile["id"], "user-1");
    assert_eq!(profile["display_name"], "Test User");
}

#[tokio::test]
async fn test_playlists_list_liked_songs_first() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(app(&mock), get_with_token("/api/spotify/playlists")).await;

    assert_eq!(status, StatusCode::OK);
    let listing = json_body(&body);
    let listing = listing.as_array().unwrap();
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0]["id"], "liked-songs");
    assert_eq!(listing[0]["name"], "Liked Songs");
    assert_eq!(listing[0]["track_count"], 3);
    assert_eq!(listing[0]["owner"], "Test User");
    assert_eq!(listing[1]["id"], "feb");
    assert_eq!(listing[1]["track_count"], 1);
    assert!(listing[1]["image_url"].is_null());
}

#[tokio::test]
async fn test_preview_of_liked_songs_follows_pages() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        get_with_token("/api/preview?identifier=liked-songs&type=id"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let previews = json_body(&body);
    let previews = previews.as_array().unwrap();
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[0]["id"], "2024-02");
    assert_eq!(previews[0]["name"], "February 2024");
    assert_eq!(previews[0]["tracks"].as_array().unwrap().len(), 2);
    assert_eq!(previews[0]["tracks"][0]["id"], "spotify:track:1");
    assert_eq!(previews[0]["tracks"][0]["artists"], "Artist A, Artist B");
    assert_eq!(previews[1]["name"], "March 2024");
}

#[tokio::test]
async fn test_preview_rejects_bad_identifier() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        get_with_token("/api/preview?identifier=https%3A%2F%2Fexample.com%2Fx"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].is_string());
}

#[tokio::test]
async fn test_malformed_requests_get_json_errors() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(app(&mock), get_with_token("/api/preview")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json_body(&body)["error"]
            .as_str()
            .unwrap()
            .contains("identifier")
    );

    let (status, _, body) = send(
        app(&mock),
        Request::post("/api/create-monthly-playlists")
            .header(header::AUTHORIZATION, "Bearer a1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "identifier": "liked-songs" }).to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json_body(&body)["error"]
            .as_str()
            .unwrap()
            .contains("playlists")
    );

    let (status, _, body) = send(
        app(&mock),
        Request::post("/api/create-monthly-playlists")
            .header(header::AUTHORIZATION, "Bearer a1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json_body(&body)["error"].is_string());

    assert!(mock.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_error_body_carries_bare_message() {
    for (err, expected) in [
        (Error::InvalidMonth("month number 13 is outside 1-12".into()), StatusCode::BAD_REQUEST),
        (Error::InvalidIdentifier("bad id".into()), StatusCode::BAD_REQUEST),
        (Error::MissingCredential("not logged in".into()), StatusCode::UNAUTHORIZED),
    ] {
        let message = match &err {
            Error::InvalidMonth(m) | Error::InvalidIdentifier(m) | Error::MissingCredential(m) => {
                m.clone()
            }
            _ => unreachable!(),
        };

        let response = err.into_response();
        assert_eq!(response.status(), expected);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(json_body(&body)["error"], message.as_str());
    }
}

#[tokio::test]
async fn test_preview_surfaces_upstream_status() {
    let mock = spawn_mock().await;

    let (status, _, body) = send(
        app(&mock),
        get_with_token(
            "/api/preview?identifier=https%3A%2F%2Fopen.spotify.com%2Fplaylist%2Fgone%3Fsi%3Dx&type=url",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body)["error"], "Resource not found");
}

#[tokio::test]
async fn test_create_monthly_playlists_updates_and_creates() {
    let mock = spawn_mock().await;
    let body = json!({
        "identifier": "liked-songs",
        "covers": false,
        "playlists": [
            { "name": "February 2024", "songs": [{ "id": "spotify:track:1" }, { "id": "spotify:track:2" }] },
            { "name": "March 2024", "songs": [{ "id": "spotify:track:3" }] }
        ]
    });

    let (status, _, response) = send(
        app(&mock),
        Request::post("/api/create-monthly-playlists")
            .header(header::AUTHORIZATION, "Bearer a1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let response = json_body(&response);
    assert_eq!(response["message"], "Processed 2 monthly playlists.");

    let playlists = response["playlists"].as_array().unwrap();
    assert_eq!(playlists[0]["id"], "feb");
    assert_eq!(playlists[0]["action"], "updated");
    assert_eq!(playlists[0]["tracks_added"], 1);
    assert_eq!(playlists[0]["url"], "https://open.spotify.com/playlist/feb");
    assert_eq!(playlists[1]["id"], "new-1");
    assert_eq!(playlists[1]["action"], "created");

    let log = mock.log.lock().unwrap().clone();
    assert_eq!(
        log,
        vec![
            "describe feb February 2024: songs added to Liked Songs. Created with Monthlify."
                .to_string(),
            "add feb spotify:track:2".to_string(),
            "create user-1 March 2024 public=false".to_string(),
            "add new-1 spotify:track:3".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_create_monthly_playlists_uploads_cover_for_new_playlist() {
    let mock = spawn_mock().await;
    let body = json!({
        "identifier": "liked-songs",
        "playlists": [{ "name": "March 2024", "songs": [{ "id": "spotify:track:3" }] }]
    });

    let (status, _, _) = send(
        app(&mock),
        Request::post("/api/create-monthly-playlists")
            .header(header::COOKIE, "spotify_access_token=a1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let log = mock.log.lock().unwrap().clone();
    assert_eq!(
        log.last().map(String::as_str),
        Some("cover new-1 image/jpeg jpeg=true")
    );
}

#[tokio::test]
async fn test_create_monthly_playlists_rejects_bad_identifier_before_writing() {
    let mock = spawn_mock().await;
    let body = json!({
        "identifier": "not a playlist",
        "playlists": [{ "name": "March 2024", "songs": [{ "id": "spotify:track:3" }] }]
    });

    let (status, _, _) = send(
        app(&mock),
        Request::post("/api/create-monthly-playlists")
            .header(header::AUTHORIZATION, "Bearer a1")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(mock.log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_cover_endpoint() {
    let mock = spawn_mock().await;

    let (status, headers, body) = send(
        app(&mock),
        Request::get("/api/images/cover/feb/2024")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert!(body.starts_with(&[0x89, b'P', b'N', b'G']));

    for uri in [
        "/api/images/cover/february/2024",
        "/api/images/cover/feb/24",
        "/api/images/cover/f3b/2024",
    ] {
        let (status, _, _) = send(app(&mock), Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }
}
