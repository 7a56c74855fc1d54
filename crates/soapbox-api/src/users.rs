use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use soapbox_types::api::{Claims, ProfileResponse};
use soapbox_types::models::{Feedback, User, parse_sqlite_timestamp};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::{removal_cookie, require_owner};

/// GET /users/{username} — the profile plus the account's feedback. Only
/// the account owner may view it.
pub async fn show_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    require_owner(&claims, &username)?;

    let row = state.db.get_user(&username)?.ok_or(ApiError::NotFound)?;
    let feedback_rows = state.db.list_feedback_for_user(&username)?;

    let user = User {
        username: row.username,
        email: row.email,
        first_name: row.first_name,
        last_name: row.last_name,
        created_at: parse_sqlite_timestamp(&row.created_at),
    };

    let feedback = feedback_rows
        .into_iter()
        .map(|row| Feedback {
            id: row.id,
            title: row.title,
            content: row.content,
            owner: row.owner,
            created_at: parse_sqlite_timestamp(&row.created_at),
        })
        .collect();

    Ok(Json(ProfileResponse { user, feedback }).into_response())
}

/// POST /users/{username}/delete — removes the account and, through the
/// schema's cascade, every feedback row it owns. The session ends with it.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> Result<Response, ApiError> {
    require_owner(&claims, &username)?;

    state.db.delete_user(&username)?;

    let jar = jar.remove(removal_cookie());
    Ok((jar, Redirect::to("/register")).into_response())
}
