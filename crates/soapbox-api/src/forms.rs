use std::collections::BTreeMap;

use serde::Serialize;

use soapbox_types::api::{FeedbackDraft, LoginRequest, RegisterRequest};

use crate::error::ApiError;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Default, Serialize)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&Vec<String>> {
        self.0.get(field)
    }

    fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

fn check_len(errors: &mut FormErrors, field: &'static str, value: &str, min: usize, max: usize) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(field, format!("Must be between {min} and {max} characters"));
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = FormErrors::default();
    check_len(&mut errors, "username", &req.username, 1, 20);
    if req.password.is_empty() {
        errors.add("password", "This field is required");
    }
    check_len(&mut errors, "email", &req.email, 1, 50);
    if !req.email.contains('@') {
        errors.add("email", "Invalid email address");
    }
    check_len(&mut errors, "first_name", &req.first_name, 2, 30);
    check_len(&mut errors, "last_name", &req.last_name, 2, 30);
    errors.into_result()
}

pub fn validate_login(req: &LoginRequest) -> Result<(), ApiError> {
    let mut errors = FormErrors::default();
    if req.username.is_empty() {
        errors.add("username", "This field is required");
    }
    if req.password.is_empty() {
        errors.add("password", "This field is required");
    }
    errors.into_result()
}

pub fn validate_feedback(draft: &FeedbackDraft) -> Result<(), ApiError> {
    let mut errors = FormErrors::default();
    check_len(&mut errors, "title", &draft.title, 2, 100);
    if draft.content.is_empty() {
        errors.add("content", "This field is required");
    }
    errors.into_result()
}

/// The constraint violation does not say which column collided; both fields
/// are reported either way, so the response cannot be used to probe which
/// usernames or emails already exist.
pub fn duplicate_account_errors() -> ApiError {
    let mut errors = FormErrors::default();
    errors.add("username", "Username taken. Please pick another username");
    errors.add("email", "This email is already being used");
    ApiError::Validation(errors)
}

pub fn duplicate_title_error() -> ApiError {
    let mut errors = FormErrors::default();
    errors.add("title", "This title is already in use");
    ApiError::Validation(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            username: "alice01".into(),
            password: "Secret123".into(),
            email: "a@x.com".into(),
            first_name: "Alice".into(),
            last_name: "An".into(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_register(&register_request()).is_ok());
    }

    #[test]
    fn username_too_long_rejected() {
        let mut req = register_request();
        req.username = "x".repeat(21);

        let Err(ApiError::Validation(errors)) = validate_register(&req) else {
            panic!("expected validation error");
        };
        assert!(errors.field("username").is_some());
        assert!(errors.field("email").is_none());
    }

    #[test]
    fn email_without_at_rejected() {
        let mut req = register_request();
        req.email = "not-an-email".into();

        let Err(ApiError::Validation(errors)) = validate_register(&req) else {
            panic!("expected validation error");
        };
        assert!(errors.field("email").is_some());
    }

    #[test]
    fn short_names_rejected() {
        let mut req = register_request();
        req.first_name = "A".into();
        req.last_name = "".into();

        let Err(ApiError::Validation(errors)) = validate_register(&req) else {
            panic!("expected validation error");
        };
        assert!(errors.field("first_name").is_some());
        assert!(errors.field("last_name").is_some());
    }

    #[test]
    fn feedback_title_bounds() {
        let short = FeedbackDraft {
            title: "x".into(),
            content: "body".into(),
        };
        assert!(validate_feedback(&short).is_err());

        let long = FeedbackDraft {
            title: "x".repeat(101),
            content: "body".into(),
        };
        assert!(validate_feedback(&long).is_err());

        let ok = FeedbackDraft {
            title: "xy".into(),
            content: "body".into(),
        };
        assert!(validate_feedback(&ok).is_ok());
    }

    #[test]
    fn empty_content_rejected() {
        let draft = FeedbackDraft {
            title: "A title".into(),
            content: "".into(),
        };

        let Err(ApiError::Validation(errors)) = validate_feedback(&draft) else {
            panic!("expected validation error");
        };
        assert!(errors.field("content").is_some());
    }
}
