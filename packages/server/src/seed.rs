use anyhow::Result;
use chrono::Utc;
use common::{Role, UserRecord, paths};
use tracing::info;

use crate::state::AppState;
use crate::utils::hash;

/// Seed a bootstrap super admin when no manager account exists yet.
///
/// Controlled by `auth.bootstrap_admin_pin`; nothing is seeded when it is
/// unset. Idempotent across restarts.
pub fn seed_bootstrap_admin(state: &AppState) -> Result<()> {
    let Some(pin) = &state.config.auth.bootstrap_admin_pin else {
        return Ok(());
    };

    let users = state.store.collection::<UserRecord>(paths::USERS)?;
    if users.list().iter().any(|u| u.role.can_manage()) {
        return Ok(());
    }

    let admin = UserRecord {
        id: uuid::Uuid::new_v4().to_string(),
        display_name: "admin".to_string(),
        team_id: None,
        role: Role::SuperAdmin,
        pin_hash: Some(hash::hash_pin(pin)?),
        created_at: Utc::now(),
    };
    users.create(&admin.id, admin.clone())?;
    info!(user_id = %admin.id, "Seeded bootstrap admin account");
    Ok(())
}
