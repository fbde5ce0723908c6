use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized(String),
    NotFound(&'static str),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::NotFound(msg) => write!(f, "{}", msg),
        }
    }
}

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::PermissionDenied) => StatusCode::FORBIDDEN,
            Self::Storage(StorageError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = match &self {
            Self::Storage(StorageError::NotFound) => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::PermissionDenied) => {
                json!({
                    "error": PERMISSION_DENIED
                })
            }
            Self::Storage(StorageError::Validation(errors)) | Self::Validation(errors) => {
                json!({
                    "error": "Validation failed",
                    "details": flatten_validation_errors(errors)
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                json!({
                    "error": msg
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::BadRequest(msg) | Self::Unauthorized(msg) => {
                json!({
                    "error": msg
                })
            }
            Self::NotFound(msg) => {
                json!({
                    "error": msg
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

/// Renders nested errors as `path: message`, e.g. `exercises[0].sets[1].weight: ...`
fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut details = Vec::new();
    collect_validation_errors(errors, "", &mut details);
    details.sort();
    details
}

fn collect_validation_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = match (prefix.is_empty(), field == "__all__") {
            (true, true) => String::new(),
            (false, true) => prefix.to_string(),
            (true, false) => field,
            (false, false) => format!("{}.{}", prefix, field),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    if path.is_empty() {
                        out.push(message);
                    } else {
                        out.push(format!("{}: {}", path, message));
                    }
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_errors(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_errors(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

pub type WebResult<T> = Result<T, WebError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::workout::UpdateWorkoutRequest;
    use validator::Validate;

    #[test]
    fn test_status_codes() {
        let cases = [
            (WebError::from(StorageError::NotFound), StatusCode::NOT_FOUND),
            (WebError::from(StorageError::PermissionDenied), StatusCode::FORBIDDEN),
            (
                WebError::from(StorageError::ConstraintViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (WebError::Unauthorized("Token has expired.".into()), StatusCode::UNAUTHORIZED),
            (WebError::NotFound("Template not found"), StatusCode::NOT_FOUND),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_nested_validation_paths() {
        let request: UpdateWorkoutRequest = serde_json::from_value(json!({
            "name": "",
            "exercises": [{
                "name": "Squat",
                "rest_period": "PT2M",
                "sets": [{"reps": 5}, {"min_reps": 10, "max_reps": 5}]
            }]
        }))
        .unwrap();

        let errors = request.validate().unwrap_err();
        let details = flatten_validation_errors(&errors);

        assert!(details.iter().any(|d| d.starts_with("name: ")));
        assert!(
            details
                .iter()
                .any(|d| d == "exercises[0].sets[1]: min_reps must not exceed max_reps")
        );
    }
}
