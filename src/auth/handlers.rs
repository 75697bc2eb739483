use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{CredentialsRequest, UserIdResponse, UserListResponse},
        error::{ApiError, AuthError},
        services,
    },
    state::AppState,
};

const GET_FAILED: &str = "Error in GET request";
const POST_FAILED: &str = "Error in POST request";

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(list_users).post(login))
        .route("/api/", get(list_users).post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(register))
        .route("/api/users/", post(register))
}

fn body(payload: &Bytes) -> Result<CredentialsRequest, ApiError> {
    CredentialsRequest::from_json(payload)
        .map_err(|e| ApiError::new(AuthError::Internal(e.to_string()), POST_FAILED))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let data = services::list_users(state.store.as_ref())
        .await
        .map_err(|e| ApiError::new(e, GET_FAILED))?;

    Ok(Json(UserListResponse {
        message: "Data fetched successfully",
        data,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user_id = services::login(state.store.as_ref(), body(&payload)?)
        .await
        .map_err(|e| ApiError::new(e, POST_FAILED))?;

    info!(user_id, "user logged in");
    Ok(Json(UserIdResponse {
        message: "Login successful",
        user_id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Bytes,
) -> Result<Json<UserIdResponse>, ApiError> {
    let user_id = services::register(state.store.as_ref(), body(&payload)?)
        .await
        .map_err(|e| ApiError::new(e, POST_FAILED))?;

    info!(user_id, "user registered");
    Ok(Json(UserIdResponse {
        message: "User registered successfully",
        user_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_response_uses_camel_case() {
        let response = UserIdResponse {
            message: "Login successful",
            user_id: 7,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["message"], "Login successful");
    }
}
