use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use soapbox_db::StoreError;
use soapbox_types::api::{Claims, FeedbackDraft};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::forms;
use crate::middleware::require_owner;

/// GET /users/{username}/feedback/add
pub async fn show_add(
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    require_owner(&claims, &username)?;
    Ok(StatusCode::OK.into_response())
}

/// POST /users/{username}/feedback/add — the new row is owned by the
/// acting identity, which the guard has already matched against the path.
pub async fn add(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<FeedbackDraft>,
) -> Result<Response, ApiError> {
    require_owner(&claims, &username)?;
    forms::validate_feedback(&draft)?;

    match state.db.create_feedback(&draft.title, &draft.content, &username) {
        Ok(_id) => Ok(Redirect::to(&format!("/users/{}", username)).into_response()),
        Err(StoreError::Duplicate) => Err(forms::duplicate_title_error()),
        Err(e) => Err(e.into()),
    }
}

/// GET /feedback/{id}/update — load the current values into an editable
/// draft for the owner.
pub async fn show_update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let row = state.db.get_feedback(id)?.ok_or(ApiError::NotFound)?;
    require_owner(&claims, &row.owner)?;

    Ok(Json(FeedbackDraft {
        title: row.title,
        content: row.content,
    })
    .into_response())
}

/// POST /feedback/{id}/update — validate the submitted draft, then commit
/// it. Ownership is checked against the stored row, not the session alone.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
    Json(draft): Json<FeedbackDraft>,
) -> Result<Response, ApiError> {
    let row = state.db.get_feedback(id)?.ok_or(ApiError::NotFound)?;
    require_owner(&claims, &row.owner)?;

    forms::validate_feedback(&draft)?;

    match state.db.update_feedback(id, &draft.title, &draft.content) {
        Ok(()) => Ok(Redirect::to(&format!("/users/{}", row.owner)).into_response()),
        Err(StoreError::Duplicate) => Err(forms::duplicate_title_error()),
        Err(e) => Err(e.into()),
    }
}

/// POST /feedback/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(claims): Extension<Claims>,
) -> Result<Response, ApiError> {
    let row = state.db.get_feedback(id)?.ok_or(ApiError::NotFound)?;
    require_owner(&claims, &row.owner)?;

    state.db.delete_feedback(id)?;

    Ok(Redirect::to(&format!("/users/{}", row.owner)).into_response())
}
