use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// An entry with its accumulated tally counters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub points: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl ScoredEntry {
    pub fn unscored(entry: Entry) -> Self {
        Self {
            entry,
            points: 0,
            gold: 0,
            silver: 0,
            bronze: 0,
        }
    }

    /// Tie-break key: points, then golds, silvers, bronzes.
    pub fn score_key(&self) -> (u32, u32, u32, u32) {
        (self.points, self.gold, self.silver, self.bronze)
    }
}

/// Podium of a sealed contest. Slots beyond the entry count stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Winners {
    pub gold: Option<String>,
    pub silver: Option<String>,
    pub bronze: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ArchiveStats {
    pub votes_cast: u32,
    pub eligible_voters: u32,
}

/// The immutable record of a finished contest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Archive {
    /// Same id as the contest it seals.
    pub id: String,
    pub display_name: String,
    pub winners: Winners,
    /// Every entry, scored, in final standing order.
    pub entries: Vec<ScoredEntry>,
    pub stats: ArchiveStats,
    pub archived_at: DateTime<Utc>,
    /// Set when an admin reclaimed the image storage; entry URLs are
    /// blank afterwards.
    #[serde(default)]
    pub images_purged: bool,
}
