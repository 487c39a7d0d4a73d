use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of a contest.
///
/// The normal monthly flow is `SubmissionsOpen -> Voting -> Archived`.
/// `Skipped` is a terminal alternative reachable from `SubmissionsOpen`
/// for months that never ran. `Virtual` is never persisted: it marks a
/// submission target synthesized from the next calendar month before any
/// upload has materialized the contest record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContestPhase {
    /// Accepting photo uploads.
    SubmissionsOpen,
    /// Uploads closed, ballots open.
    Voting,
    /// Sealed; results live in the archive record.
    Archived,
    /// Month ran no contest. Terminal, no content.
    Skipped,
    /// Synthesized submission target, not yet persisted.
    Virtual,
}

impl ContestPhase {
    /// Phases shown to users as "current" contests.
    pub const ACTIVE: &'static [ContestPhase] = &[
        Self::SubmissionsOpen,
        Self::Voting,
        Self::Skipped,
    ];

    pub fn accepts_uploads(&self) -> bool {
        matches!(self, Self::SubmissionsOpen | Self::Virtual)
    }

    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Voting)
    }

    /// Terminal phases can never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived | Self::Skipped)
    }

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SubmissionsOpen => "submissions_open",
            Self::Voting => "voting",
            Self::Archived => "archived",
            Self::Skipped => "skipped",
            Self::Virtual => "virtual",
        }
    }
}

impl fmt::Display for ContestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid phase string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid contest phase '{0}'")]
pub struct ParsePhaseError(String);

impl FromStr for ContestPhase {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submissions_open" => Ok(Self::SubmissionsOpen),
            "voting" => Ok(Self::Voting),
            "archived" => Ok(Self::Archived),
            "skipped" => Ok(Self::Skipped),
            "virtual" => Ok(Self::Virtual),
            _ => Err(ParsePhaseError(s.to_string())),
        }
    }
}
