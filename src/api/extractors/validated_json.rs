//! Validated JSON extractor - Combines deserialization with validation.

use std::collections::BTreeSet;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// Malformed bodies and failed validation both become
/// [`AppError::Validation`], so the handler only ever sees checked input.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use credential_service::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct LoginRequest {
///     #[validate(required, length(min = 1))]
///     email: Option<String>,
/// }
///
/// async fn login(ValidatedJson(payload): ValidatedJson<LoginRequest>) {
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
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Format validation errors into a user-friendly string.
///
/// Fields sharing a message are reported once.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Validate)]
    struct Pair {
        #[validate(required(message = "Both are required"), length(min = 1, message = "Both are required"))]
        a: Option<String>,
        #[validate(required(message = "Both are required"), length(min = 1, message = "Both are required"))]
        b: Option<String>,
        #[validate(length(min = 2))]
        c: Option<String>,
    }

    #[test]
    fn test_duplicate_messages_collapse() {
        let pair = Pair {
            a: None,
            b: Some(String::new()),
            c: None,
        };

        let errors = pair.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "Both are required");
    }

    #[test]
    fn test_missing_message_names_field() {
        let pair = Pair {
            a: Some("x".into()),
            b: Some("y".into()),
            c: Some("z".into()),
        };

        let errors = pair.validate().unwrap_err();
        assert_eq!(format_validation_errors(&errors), "c is invalid");
    }
}
