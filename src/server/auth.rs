use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::{AppState, ApiError};
use crate::auth::{Identity, SessionClaims};
use crate::consts::{SESSION_COOKIE, SESSION_TTL_MS};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    user: Option<Identity>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Authenticated,
    Unauthenticated,
}

#[derive(Debug, Serialize)]
pub struct SessionBody {
    status: SessionStatus,
    user: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires: Option<u64>,
}

/// Claims of the caller's session: the session cookie, or a bearer token.
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<SessionClaims> {
    let token = session_cookie(headers).or_else(|| bearer_token(headers))?;
    state.sessions.verify(&token)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn session_cookie_header(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `POST /api/auth/login`: urlencoded `email` + `password`.
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let unauthenticated = || (StatusCode::UNAUTHORIZED, Json(LoginBody { user: None })).into_response();

    let Ok(Form(form)) = form else {
        return Ok(unauthenticated());
    };

    let Some(identity) = state.verifier.verify(&form.email, &form.password).await? else {
        tracing::info!("login rejected");
        return Ok(unauthenticated());
    };

    let token = state.sessions.issue(&identity);
    let cookie = session_cookie_header(&token, SESSION_TTL_MS / 1000, state.secure_cookies);
    tracing::info!(user = %identity.email, "login accepted");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginBody {
            user: Some(identity),
        }),
    )
        .into_response())
}

/// `POST /api/auth/logout`: expire the session cookie.
pub async fn logout(State(state): State<AppState>) -> Response {
    let cookie = session_cookie_header("", 0, state.secure_cookies);
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]).into_response()
}

/// `GET /api/auth/session`: guest or authenticated.
pub async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionBody> {
    match current_session(&state, &headers) {
        Some(claims) => Json(SessionBody {
            status: SessionStatus::Authenticated,
            user: Some(claims.identity()),
            expires: Some(claims.exp),
        }),
        None => Json(SessionBody {
            status: SessionStatus::Unauthenticated,
            user: None,
            expires: None,
        }),
    }
}
