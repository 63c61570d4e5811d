use serde::{Deserialize, Serialize};

use super::repo_types::Role;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Plain acknowledgement, `{"message": ...}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Identity echo returned on successful login. No token is issued.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub username: String,
    pub role: String,
}
