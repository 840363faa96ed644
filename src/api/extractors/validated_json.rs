//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, OriginalUri, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::errors::{ApiError, AppError, ValidationErrorMap};

/// Validated JSON extractor that automatically validates requests.
///
/// Rejections are answered with an [`ApiError`] whose `url` is the path
/// the client called and whose `validationErrors` hold one message per
/// invalid field.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use signup_api::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct RenameRequest {
///     #[validate(required(message = "Cannot be null"), length(min = 4))]
///     name: Option<String>,
/// }
///
/// async fn rename(ValidatedJson(payload): ValidatedJson<RenameRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from req.uri()
        let url = req
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.path().to_string())
            .unwrap_or_else(|| req.uri().path().to_string());

        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()).into_api_error(url.as_str()))?;

        value.validate().map_err(|e| {
            let errors = collect_field_errors(&e);
            tracing::debug!(url = %url, fields = ?errors.keys().collect::<Vec<_>>(), "Request validation failed");
            AppError::Validation(errors).into_api_error(url.as_str())
        })?;

        Ok(ValidatedJson(value))
    }
}

/// Reduce validator output to one message per field.
///
/// Fields are keyed by their camelCase JSON name. When a field breaks
/// several rules, presence wins over length, and length over any other rule.
pub fn collect_field_errors(errors: &ValidationErrors) -> ValidationErrorMap {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            errs.iter()
                .min_by_key(|e| rule_rank(e))
                .map(|e| (to_camel_case(&field), message_for(&field, e)))
        })
        .collect()
}

fn rule_rank(error: &ValidationError) -> u8 {
    match &*error.code {
        "required" => 0,
        "length" => 1,
        _ => 2,
    }
}

fn message_for(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", to_camel_case(field)))
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
