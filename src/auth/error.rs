use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database query failed: {0}")]
    Query(sqlx::Error),

    #[error("unexpected row shape: {0}")]
    Decode(String),

    #[error("name already exists")]
    Duplicate,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => Self::Decode(e.to_string()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Self::Duplicate,
            other => Self::Query(other),
        }
    }
}

/// Failure of a registration, login or listing workflow.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Name and password are required")]
    Validation,

    #[error("Name already taken")]
    Conflict,

    #[error("User not found")]
    NotFound,

    #[error("Invalid password")]
    Unauthorized,

    #[error("registration failed")]
    RegistrationFailed,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RegistrationFailed | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// An [`AuthError`] bound to the message its endpoint reports for 500s.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(err: AuthError, failure_message: &str) -> Self {
        let status = err.status();
        let body = match err {
            AuthError::RegistrationFailed => ErrorBody {
                message: "Error registering user".into(),
                error: Some(err.to_string()),
            },
            _ if status.is_server_error() => ErrorBody {
                message: failure_message.into(),
                error: Some(err.to_string()),
            },
            _ => ErrorBody {
                message: err.to_string(),
                error: None,
            },
        };
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = ?self.body.error, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_carry_only_a_message() {
        let api = ApiError::new(AuthError::Conflict, "Error in POST request");
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.body.message, "Name already taken");
        assert!(api.body.error.is_none());

        let json = serde_json::to_value(&api.body).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Name already taken" }));
    }

    #[test]
    fn server_errors_echo_the_diagnostic() {
        let api = ApiError::new(
            AuthError::Store(StoreError::Unavailable("pool closed".into())),
            "Error in GET request",
        );
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.message, "Error in GET request");
        assert_eq!(api.body.error.as_deref(), Some("store unavailable: pool closed"));
    }

    #[test]
    fn zero_row_registration_has_its_own_message() {
        let api = ApiError::new(AuthError::RegistrationFailed, "Error in POST request");
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.body.message, "Error registering user");
        assert_eq!(api.body.error.as_deref(), Some("registration failed"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AuthError::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn sqlx_decode_failures_become_decode_errors() {
        let err: StoreError = sqlx::Error::ColumnNotFound("password".into()).into();
        assert!(matches!(err, StoreError::Decode(_)));

        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, StoreError::Query(_)));
    }
}
