use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use soapbox_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Name of the cookie carrying the signed identity token.
pub const SESSION_COOKIE: &str = "session";

const SESSION_DAYS: i64 = 30;

/// Issue a signed session token binding `username` as the identity.
pub fn issue_token(secret: &str, username: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {}", e)))
}

/// Decode and verify a session token. Tampered, expired or otherwise
/// malformed tokens come back as `None`.
pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// The identity bound to the request's session cookie, if any.
pub fn current_identity(jar: &CookieJar, secret: &str) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    decode_token(secret, cookie.value()).map(|claims| claims.sub)
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

/// Passed to `CookieJar::remove` so the expiry reaches the client with the
/// same path the session cookie was set under.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Extract and validate the session cookie, stashing the claims as a
/// request extension for the handlers behind this layer.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let cookie = jar.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;
    let claims =
        decode_token(&state.session_secret, cookie.value()).ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// The single authorization rule: the acting identity must equal the
/// resource's owning username. Runs before any read or write of the
/// resource's contents.
pub fn require_owner(claims: &Claims, owner: &str) -> Result<(), ApiError> {
    if claims.sub != owner {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = issue_token("secret", "alice01").unwrap();
        let claims = decode_token("secret", &token).unwrap();
        assert_eq!(claims.sub, "alice01");
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("secret", "alice01").unwrap();
        assert!(decode_token("other-secret", &token).is_none());
    }

    #[test]
    fn tampered_token_rejected() {
        let token = issue_token("secret", "alice01").unwrap();
        let flipped = if token.ends_with('A') { 'B' } else { 'A' };
        let mut tampered = token;
        tampered.pop();
        tampered.push(flipped);
        assert!(decode_token("secret", &tampered).is_none());
    }

    #[test]
    fn ownership_requires_exact_match() {
        let claims = Claims {
            sub: "alice01".into(),
            exp: usize::MAX,
        };
        assert!(require_owner(&claims, "alice01").is_ok());
        assert!(matches!(
            require_owner(&claims, "bob02"),
            Err(ApiError::Unauthorized)
        ));
    }
}
