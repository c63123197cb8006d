use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::Error;

pub const ACCESS_TOKEN_COOKIE: &str = "spotify_access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "spotify_refresh_token";

const REFRESH_TOKEN_MAX_AGE: Duration = Duration::days(30);

/// The caller's Spotify access token.
///
/// Taken from the `spotify_access_token` cookie, or from an
/// `Authorization: Bearer <token>` header when no cookie is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken(pub String);

impl<S> FromRequestParts<S> for AccessToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
            if !cookie.value().is_empty() {
                return Ok(AccessToken(cookie.value().to_string()));
            }
        }

        parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| AccessToken(t.to_string()))
            .ok_or_else(|| Error::MissingCredential("not logged in to Spotify".to_string()))
    }
}

/// Refresh token from the request cookies, if any.
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub fn access_cookie(token: &str, expires_in: u64) -> Cookie<'static> {
    let max_age = Duration::seconds(i64::try_from(expires_in).unwrap_or(i64::MAX));
    session_cookie(ACCESS_TOKEN_COOKIE, token, max_age)
}

pub fn refresh_cookie(token: &str) -> Cookie<'static> {
    session_cookie(REFRESH_TOKEN_COOKIE, token, REFRESH_TOKEN_MAX_AGE)
}

/// Cookie that removes `name` when passed to [`CookieJar::remove`]. The path
/// has to match the one the cookie was set with.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn session_cookie(name: &'static str, value: &str, max_age: Duration) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}
