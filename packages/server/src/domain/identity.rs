use chrono::Utc;
use common::UserRecord;
use tracing::info;

use crate::error::AppError;
use crate::models::user::CreateUserRequest;
use crate::state::AppState;
use crate::utils::{hash, jwt};

/// Display-name lookup, case-insensitive.
pub fn find_by_name(state: &AppState, name: &str) -> Result<Option<UserRecord>, AppError> {
    let needle = name.trim().to_lowercase();
    Ok(state
        .users()?
        .list()
        .into_iter()
        .find(|u| u.display_name.to_lowercase() == needle))
}

/// Authenticate by display name, verifying the PIN when the account has
/// one, and issue a session token.
pub fn login(
    state: &AppState,
    name: &str,
    pin: Option<&str>,
) -> Result<(UserRecord, String), AppError> {
    let user = find_by_name(state, name)?.ok_or(AppError::InvalidCredentials)?;

    if let Some(phc) = &user.pin_hash {
        let pin = pin.ok_or(AppError::InvalidCredentials)?;
        let valid = hash::verify_pin(pin, phc)
            .map_err(|e| AppError::Internal(format!("PIN verify error: {e}")))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }
    }

    let token = jwt::sign(
        &user.id,
        &user.display_name,
        user.team_id.as_deref(),
        user.role,
        state.config.auth.token_ttl_days,
        &state.config.auth.jwt_secret,
    )
    .map_err(|e| AppError::Internal(format!("JWT sign error: {e}")))?;

    Ok((user, token))
}

/// Register a user. Display names are unique case-insensitively.
pub fn create_user(state: &AppState, payload: &CreateUserRequest) -> Result<UserRecord, AppError> {
    if find_by_name(state, &payload.display_name)?.is_some() {
        return Err(AppError::Duplicate(format!(
            "A user named '{}' already exists",
            payload.display_name.trim()
        )));
    }

    let pin_hash = match &payload.pin {
        Some(pin) => Some(
            hash::hash_pin(pin).map_err(|e| AppError::Internal(format!("PIN hash error: {e}")))?,
        ),
        None => None,
    };

    let user = UserRecord {
        id: uuid::Uuid::new_v4().to_string(),
        display_name: payload.display_name.trim().to_string(),
        team_id: payload.team_id.clone(),
        role: payload.role.unwrap_or_default(),
        pin_hash,
        created_at: Utc::now(),
    };

    state.users()?.create(&user.id, user.clone())?;
    info!(user_id = %user.id, name = %user.display_name, role = %user.role, "User created");
    Ok(user)
}

pub fn delete_user(state: &AppState, user_id: &str) -> Result<(), AppError> {
    if !state.users()?.delete(user_id) {
        return Err(AppError::NotFound(format!("User '{user_id}' not found")));
    }
    info!(user_id, "User deleted");
    Ok(())
}
