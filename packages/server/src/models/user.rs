use chrono::{DateTime, Utc};
use common::{Role, UserRecord};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for registering a user (admin only).
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Alice")]
    pub display_name: String,
    pub team_id: Option<String>,
    /// Defaults to `member`.
    pub role: Option<Role>,
    /// Optional login PIN (4-32 characters).
    pub pin: Option<String>,
}

pub fn validate_create_user(payload: &CreateUserRequest) -> Result<(), AppError> {
    let name = payload.display_name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation(
            "Display name must be 1-64 characters".into(),
        ));
    }
    if let Some(pin) = &payload.pin {
        if pin.len() < 4 || pin.len() > 32 {
            return Err(AppError::Validation("PIN must be 4-32 characters".into()));
        }
    }
    Ok(())
}

/// A user as returned by the API. Never includes the PIN hash.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub display_name: String,
    pub team_id: Option<String>,
    pub role: Role,
    /// Whether a PIN is required to log in.
    pub has_pin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            team_id: user.team_id,
            role: user.role,
            has_pin: user.pin_hash.is_some(),
            created_at: user.created_at,
        }
    }
}
