use common::Contest;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for creating an ad-hoc contest.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateContestRequest {
    /// Contest id. Monthly contests use `YYYY-MM`; ad-hoc ids are free-form
    /// but must be key-safe.
    #[schema(example = "2026-03")]
    pub id: String,
    #[schema(example = "March 2026")]
    pub display_name: String,
    /// Restrict visibility to one team.
    pub team_id: Option<String>,
    /// Whether uploads must carry order/photo numbers. Defaults to true.
    pub metadata_required: Option<bool>,
}

pub fn validate_create_contest(payload: &CreateContestRequest) -> Result<(), AppError> {
    let id = payload.id.trim();
    if id.is_empty() || id.chars().count() > 64 {
        return Err(AppError::Validation("Contest id must be 1-64 characters".into()));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::Validation(
            "Contest id must contain only letters, digits, hyphens, and underscores".into(),
        ));
    }
    if payload.display_name.trim().is_empty() {
        return Err(AppError::Validation("Display name must not be empty".into()));
    }
    Ok(())
}

/// Team-scoped view of the contest directory.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ActiveContestsResponse {
    /// Visible contests in `{SubmissionsOpen, Voting, Skipped}`, newest first.
    pub contests: Vec<Contest>,
    /// Latest visible voting contest, if any.
    pub voting_target: Option<Contest>,
    /// Where an upload would land right now. May be a virtual contest.
    pub submission_target: Contest,
}
