use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::period::MonthPeriod;
use crate::phase::ContestPhase;
use crate::user::Viewer;

fn default_true() -> bool {
    true
}

/// One month's contest record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Contest {
    /// `YYYY-MM` for scheduler-created contests, free-form for ad-hoc ones.
    pub id: String,
    pub display_name: String,
    pub phase: ContestPhase,
    /// Unset means visible to everyone.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Whether uploads must carry order/photo numbers.
    #[serde(default = "default_true")]
    pub metadata_required: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Contest {
    /// A fresh submissions-open contest for the given month.
    pub fn for_period(period: MonthPeriod, team_id: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: period.key(),
            display_name: period.display_name(),
            phase: ContestPhase::SubmissionsOpen,
            team_id,
            metadata_required: true,
            created_at: now,
            voting_started_at: None,
            archived_at: None,
        }
    }

    /// Synthesized submission target for a month with no persisted contest.
    pub fn virtual_for(period: MonthPeriod, now: DateTime<Utc>) -> Self {
        Self {
            phase: ContestPhase::Virtual,
            ..Self::for_period(period, None, now)
        }
    }

    /// Team scoping: a contest with no team is visible to everyone, and
    /// super admins see across teams.
    pub fn visible_to(&self, viewer: &Viewer) -> bool {
        if viewer.role.sees_all_teams() {
            return true;
        }
        match (&self.team_id, &viewer.team_id) {
            (None, _) => true,
            (Some(contest_team), Some(viewer_team)) => contest_team == viewer_team,
            (Some(_), None) => false,
        }
    }
}
