use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Key the backend uses for errors not tied to a single field.
const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Bad request: {}", truncate_body(.0))]
    BadRequest(String),

    #[error("Unauthorized: {}", truncate_body(.0))]
    Unauthorized(String),

    #[error("Forbidden: {}", truncate_body(.0))]
    Forbidden(String),

    #[error("Resource not found: {}", truncate_body(.0))]
    NotFound(String),

    #[error("Status {status}: {}", truncate_body(.body))]
    Status { status: StatusCode, body: String },

    #[error("{0}")]
    Validation(String),

    #[error("Not authenticated - log in first")]
    Unauthenticated,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest(body),
            401 => ApiError::Unauthorized(body),
            403 => ApiError::Forbidden(body),
            404 => ApiError::NotFound(body),
            _ => ApiError::Status { status, body },
        }
    }

    /// Turn a `BadRequest` carrying field errors into `Validation`.
    ///
    /// Any other error, or a body that is not a map of field messages, is
    /// returned unchanged.
    pub fn into_validation(self) -> Self {
        match self {
            ApiError::BadRequest(body) => match field_errors_message(&body) {
                Some(message) => ApiError::Validation(message),
                None => ApiError::BadRequest(body),
            },
            other => other,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Flatten a field-error payload into one message, one error per line.
///
/// `non_field_errors` lead, the remaining fields follow in payload order.
/// Returns `None` when the payload is not an object of strings or string
/// lists, or carries no messages at all.
pub fn field_errors_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let fields = value.as_object()?;

    let mut lines = Vec::new();
    if let Some(errors) = fields.get(NON_FIELD_ERRORS) {
        collect_messages(errors, &mut lines)?;
    }
    for (field, errors) in fields {
        if field != NON_FIELD_ERRORS {
            collect_messages(errors, &mut lines)?;
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn collect_messages(value: &Value, lines: &mut Vec<String>) -> Option<()> {
    match value {
        Value::String(message) => lines.push(message.clone()),
        Value::Array(items) => {
            for item in items {
                lines.push(item.as_str()?.to_string());
            }
        }
        _ => return None,
    }
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_known_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, String::new()),
            ApiError::BadRequest(_)
        ));
        assert!(ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()).is_unauthorized());
        assert!(matches!(
            ApiError::from_status(StatusCode::FORBIDDEN, String::new()),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, String::new()),
            ApiError::NotFound(_)
        ));
        match ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream".into()) {
            ApiError::Status { status, body } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_field_error_is_bare_message() {
        let message = field_errors_message(r#"{"email": ["Invalid email"]}"#);
        assert_eq!(message.as_deref(), Some("Invalid email"));
    }

    #[test]
    fn test_non_field_errors_lead() {
        let message =
            field_errors_message(r#"{"username": ["taken"], "non_field_errors": ["Already exists"]}"#)
                .expect("field errors");
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines, vec!["Already exists", "taken"]);
    }

    #[test]
    fn test_multiple_fields_keep_payload_order() {
        let message = field_errors_message(
            r#"{"password1": ["Too short", "Too common"], "email": "Invalid email"}"#,
        );
        assert_eq!(
            message.as_deref(),
            Some("Too short\nToo common\nInvalid email")
        );
    }

    #[test]
    fn test_unexpected_shapes_are_rejected() {
        assert_eq!(field_errors_message("not json"), None);
        assert_eq!(field_errors_message(r#"["a", "b"]"#), None);
        assert_eq!(field_errors_message(r#"{"nested": {"a": ["b"]}}"#), None);
        assert_eq!(field_errors_message(r#"{"count": [1, 2]}"#), None);
        assert_eq!(field_errors_message("{}"), None);
    }

    #[test]
    fn test_into_validation_only_touches_bad_request() {
        let err = ApiError::BadRequest(r#"{"email": ["Invalid email"]}"#.into()).into_validation();
        assert_eq!(err.to_string(), "Invalid email");

        let raw = ApiError::BadRequest("<html>oops</html>".into()).into_validation();
        assert!(matches!(raw, ApiError::BadRequest(_)));

        let unauthorized =
            ApiError::Unauthorized(r#"{"detail": "Invalid token."}"#.into()).into_validation();
        assert!(unauthorized.is_unauthorized());
    }

    #[test]
    fn test_long_bodies_are_truncated_in_display() {
        let err = ApiError::Forbidden("x".repeat(800));
        let shown = err.to_string();
        assert!(shown.contains("truncated, 800 total bytes"));
        assert!(shown.len() < 600);
    }
}
