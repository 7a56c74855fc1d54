use serde::{Deserialize, Serialize};

use crate::models::{Feedback, User};

// -- Session claims --

/// JWT claims shared between the auth handlers (token issue) and the
/// session middleware (token verification). Canonical definition lives
/// here in soapbox-types to eliminate duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated username.
    pub sub: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Users --

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: User,
    pub feedback: Vec<Feedback>,
}

// -- Feedback --

/// The editable fields of a feedback record.
///
/// Serves double duty: the edit endpoint returns the current values as a
/// draft on GET, and accepts a filled-in draft on POST. The owner is never
/// part of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeedbackDraft {
    pub title: String,
    pub content: String,
}
