use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authorization level of a registered user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Admin,
    /// Sees across team boundaries in addition to admin powers.
    SuperAdmin,
}

impl Role {
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    pub fn sees_all_teams(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Member
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity facts visibility checks need: team scope and role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub team_id: Option<String>,
    pub role: Role,
}

/// A registered participant in the identity directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserRecord {
    pub id: String,
    pub display_name: String,
    /// Unset means the user is visible to every team scope.
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Argon2 PHC string. Users without one log in by name alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn viewer(&self) -> Viewer {
        Viewer {
            user_id: self.id.clone(),
            team_id: self.team_id.clone(),
            role: self.role,
        }
    }
}
