use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,                // assigned by the store on insert
    pub name: String,           // login identifier
    #[sqlx(rename = "password")]
    #[serde(rename = "password")]
    pub password_hash: String,  // Argon2 PHC string, salt included
}
