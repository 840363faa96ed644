//! User handlers.

use std::borrow::Cow;

use axum::{
    extract::{OriginalUri, State},
    response::Json,
    routing::post,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MSG_PASSWORD_PATTERN, MSG_USER_SAVED, USERS_PATH};
use crate::domain::{NewUser, Password};
use crate::errors::{ApiError, AppError, AppResult};
use crate::types::GenericResponse;

/// User registration request
#[derive(Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Unique login name
    #[validate(
        required(message = "Username cannot be null"),
        length(min = 4, max = 255, message = "It must have minimum 4 and maximum 255 characters")
    )]
    #[schema(example = "test-user", min_length = 4, max_length = 255)]
    pub username: Option<String>,

    /// Name shown to other users
    #[serde(rename = "displayName")]
    #[validate(
        required(message = "Cannot be null"),
        length(min = 4, max = 255, message = "It must have minimum 4 and maximum 255 characters")
    )]
    #[schema(example = "test-display", min_length = 4, max_length = 255)]
    pub display_name: Option<String>,

    /// Needs an uppercase letter, a lowercase letter and a digit
    #[validate(
        required(message = "Cannot be null"),
        length(min = 8, max = 255, message = "It must have minimum 8 and maximum 255 characters"),
        custom(function = "validate_password_pattern")
    )]
    #[schema(example = "P4ssword", min_length = 8, max_length = 255)]
    pub password: Option<String>,
}

// Don't expose the password in debug output
impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn validate_password_pattern(password: &str) -> Result<(), ValidationError> {
    if Password::is_strong(password) {
        return Ok(());
    }

    let mut error = ValidationError::new("password_pattern");
    error.message = Some(Cow::Borrowed(MSG_PASSWORD_PATTERN));
    Err(error)
}

impl SignupRequest {
    /// Unwrap the validated fields.
    fn into_new_user(self) -> AppResult<NewUser> {
        match (self.username, self.display_name, self.password) {
            (Some(username), Some(display_name), Some(password)) => Ok(NewUser {
                username,
                display_name,
                password,
            }),
            _ => Err(AppError::bad_request("Request is missing required fields")),
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route(USERS_PATH, post(create_user))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/1.0/users",
    tag = "Users",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User saved", body = GenericResponse),
        (status = 400, description = "Invalid fields or username in use", body = crate::errors::ApiErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<Json<GenericResponse>, ApiError> {
    let new_user = payload
        .into_new_user()
        .map_err(|e| e.into_api_error(uri.path()))?;

    state
        .user_service
        .signup(new_user)
        .await
        .map_err(|e| e.into_api_error(uri.path()))?;

    Ok(Json(GenericResponse::new(MSG_USER_SAVED)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extractors::collect_field_errors;
    use crate::errors::ValidationErrorMap;

    fn request(username: Option<&str>, display_name: Option<&str>, password: Option<&str>) -> SignupRequest {
        SignupRequest {
            username: username.map(str::to_string),
            display_name: display_name.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    fn valid() -> SignupRequest {
        request(Some("test-user"), Some("test-display"), Some("P4ssword"))
    }

    fn field_errors(request: &SignupRequest) -> ValidationErrorMap {
        match request.validate() {
            Ok(()) => ValidationErrorMap::new(),
            Err(e) => collect_field_errors(&e),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_empty_request_reports_every_field() {
        let errors = field_errors(&request(None, None, None));

        assert_eq!(errors.len(), 3);
        assert_eq!(errors["username"], "Username cannot be null");
        assert_eq!(errors["displayName"], "Cannot be null");
        assert_eq!(errors["password"], "Cannot be null");
    }

    #[test]
    fn test_only_violated_fields_are_reported() {
        let errors = field_errors(&request(None, Some("test-display"), Some("P4ssword")));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["username"], "Username cannot be null");
    }

    #[test]
    fn test_length_bounds() {
        let long = "a".repeat(256);

        let errors = field_errors(&request(Some("abc"), Some(&long), Some("P4sswd")));
        assert_eq!(errors["username"], "It must have minimum 4 and maximum 255 characters");
        assert_eq!(errors["displayName"], "It must have minimum 4 and maximum 255 characters");
        assert_eq!(errors["password"], "It must have minimum 8 and maximum 255 characters");

        let max = "a".repeat(255);
        assert!(field_errors(&request(Some(&max), Some(&max), Some("P4ssword"))).is_empty());
        assert!(field_errors(&request(Some("abcd"), Some("abcd"), Some("P4ssword"))).is_empty());
    }

    #[test]
    fn test_length_counts_characters() {
        // 4 characters, 8 bytes
        let errors = field_errors(&request(Some("ñöüé"), Some("test-display"), Some("P4ssword")));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_password_pattern() {
        for password in ["alllowercase", "ALLUPPERCASE", "123456789"] {
            let errors = field_errors(&request(Some("test-user"), Some("test-display"), Some(password)));
            assert_eq!(
                errors["password"],
                "Password must have at least one uppercase, one lowercase and one number",
                "password {:?}",
                password
            );
        }
    }

    #[test]
    fn test_too_long_password_reports_size_not_pattern() {
        let password = format!("{}A1", "a".repeat(256));
        let errors = field_errors(&request(Some("test-user"), Some("test-display"), Some(&password)));

        assert_eq!(errors["password"], "It must have minimum 8 and maximum 255 characters");
    }

    #[test]
    fn test_short_weak_password_reports_size_first() {
        let errors = field_errors(&request(Some("test-user"), Some("test-display"), Some("abc")));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors["password"], "It must have minimum 8 and maximum 255 characters");
    }

    #[test]
    fn test_into_new_user() {
        let new_user = valid().into_new_user().unwrap();
        assert_eq!(new_user.username, "test-user");
        assert_eq!(new_user.display_name, "test-display");
        assert_eq!(new_user.password, "P4ssword");

        assert!(request(None, Some("test-display"), Some("P4ssword"))
            .into_new_user()
            .is_err());
    }

    #[test]
    fn test_deserializes_camel_case_and_nulls() {
        let parsed: SignupRequest = serde_json::from_str(
            r#"{"username": null, "displayName": "test-display", "password": "P4ssword"}"#,
        )
        .unwrap();

        assert!(parsed.username.is_none());
        assert_eq!(parsed.display_name.as_deref(), Some("test-display"));

        let empty: SignupRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.username.is_none() && empty.display_name.is_none() && empty.password.is_none());
    }

    #[test]
    fn test_debug_hides_password() {
        assert!(!format!("{:?}", valid()).contains("P4ssword"));
    }
}
