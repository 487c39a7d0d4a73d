use common::Role;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Display name, matched case-insensitively.
    #[schema(example = "Alice")]
    pub name: String,
    /// PIN. Required only for accounts that have one set.
    #[schema(example = "1234")]
    pub pin: Option<String>,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Name must not be empty".into()));
    }
    Ok(())
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// JWT bearer token.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub id: String,
    pub display_name: String,
    pub team_id: Option<String>,
    pub role: Role,
}

/// Current authenticated user's profile.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub id: String,
    pub display_name: String,
    pub team_id: Option<String>,
    pub role: Role,
}
