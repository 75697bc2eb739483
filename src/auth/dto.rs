use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::Value;

use crate::auth::repo_types::User;

/// Request body shared by login and registration. Both fields may be
/// missing on the wire; the workflows reject that with a 400.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Decodes a request body regardless of its content type. Only a JSON
    /// object carries credentials: arrays and scalars decode to an empty
    /// request, and `null` or invalid JSON is an error.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            Value::Null => Err(serde_json::Error::custom("request body is null")),
            _ => Ok(Self::default()),
        }
    }
}

/// Response for a successful login or registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdResponse {
    pub message: &'static str,
    pub user_id: i64,
}

/// Response for the user listing.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub message: &'static str,
    pub data: Vec<User>,
}
