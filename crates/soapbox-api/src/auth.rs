use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use soapbox_db::{Database, StoreError};
use soapbox_types::api::{LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::forms;
use crate::middleware::{self, removal_cookie, session_cookie};
use crate::password;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
}

/// GET /register — an authenticated caller is sent to their own profile
/// instead of the registration form.
pub async fn show_register(State(state): State<AppState>, jar: CookieJar) -> Response {
    match middleware::current_identity(&jar, &state.session_secret) {
        Some(username) => Redirect::to(&format!("/users/{}", username)).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// POST /register — create the account and bind the session to it.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    if let Some(username) = middleware::current_identity(&jar, &state.session_secret) {
        return Ok(Redirect::to(&format!("/users/{}", username)).into_response());
    }

    forms::validate_register(&req)?;

    let password_hash = password::hash(&req.password)?;

    match state.db.create_user(
        &req.username,
        &password_hash,
        &req.email,
        &req.first_name,
        &req.last_name,
    ) {
        Ok(()) => {}
        Err(StoreError::Duplicate) => return Err(forms::duplicate_account_errors()),
        Err(e) => return Err(e.into()),
    }

    let token = middleware::issue_token(&state.session_secret, &req.username)?;
    let jar = jar.add(session_cookie(token));

    Ok((jar, Redirect::to(&format!("/users/{}", req.username))).into_response())
}

/// GET /login
pub async fn show_login(State(state): State<AppState>, jar: CookieJar) -> Response {
    match middleware::current_identity(&jar, &state.session_secret) {
        Some(username) => Redirect::to(&format!("/users/{}", username)).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// POST /login — the failure response never says whether the username or
/// the password was the wrong half.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    if let Some(username) = middleware::current_identity(&jar, &state.session_secret) {
        return Ok(Redirect::to(&format!("/users/{}", username)).into_response());
    }

    forms::validate_login(&req)?;

    let user = state.db.get_user(&req.username)?;
    let authenticated = match &user {
        Some(row) => password::verify(&req.password, &row.password),
        None => false,
    };
    if !authenticated {
        return Err(ApiError::InvalidCredentials);
    }

    let token = middleware::issue_token(&state.session_secret, &req.username)?;
    let jar = jar.add(session_cookie(token));

    Ok((jar, Redirect::to(&format!("/users/{}", req.username))).into_response())
}

/// GET /logout — clearing an absent session is a no-op, never an error.
pub async fn logout(jar: CookieJar) -> Response {
    let jar = jar.remove(removal_cookie());
    (jar, Redirect::to("/")).into_response()
}
