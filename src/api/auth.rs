use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    Error, Res,
    api::session::{self, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    server::AppState,
    spotify::auth,
    success,
};

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}

pub async fn login(State(state): State<AppState>) -> Res<Json<Value>> {
    let auth_url = auth::authorize_url(&state.config)?;
    Ok(Json(json!({ "auth_url": auth_url })))
}

/// Completes the authorization-code flow.
///
/// Exchanges `code` for tokens, stores the access token (expiring with the
/// token) and the refresh token (30 days) as HttpOnly cookies and sends the
/// browser back to the front-end.
///
/// # Errors
///
/// - `MissingCredential` when Spotify sent no code, for example because the
///   user declined the consent screen
/// - `Upstream` when the code exchange is rejected
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Res<(CookieJar, Redirect)> {
    let code = match query.code.filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            let reason = query
                .error
                .unwrap_or_else(|| "no authorization code provided".to_string());
            return Err(Error::MissingCredential(reason));
        }
    };

    let token = auth::exchange_code(&state.http, &state.config, &code).await?;

    let mut jar = jar.add(session::access_cookie(&token.access_token, token.expires_in));
    if let Some(refresh) = token.refresh_token.as_deref() {
        jar = jar.add(session::refresh_cookie(refresh));
    }

    success!("Spotify login completed");
    Ok((jar, Redirect::to(&state.config.frontend_origin)))
}

/// Uses the refresh cookie to replace the access token cookie.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Res<(CookieJar, Json<Value>)> {
    let refresh_token = session::refresh_token(&jar)
        .ok_or_else(|| Error::MissingCredential("no refresh token cookie".to_string()))?;

    let token = auth::refresh_token(&state.http, &state.config, &refresh_token).await?;

    let mut jar = jar.add(session::access_cookie(&token.access_token, token.expires_in));
    if let Some(rotated) = token.refresh_token.as_deref() {
        jar = jar.add(session::refresh_cookie(rotated));
    }

    Ok((jar, Json(json!({ "expires_in": token.expires_in }))))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar
        .remove(session::removal_cookie(ACCESS_TOKEN_COOKIE))
        .remove(session::removal_cookie(REFRESH_TOKEN_COOKIE));
    (jar, Json(json!({ "message": "Logged out" })))
}
