use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// Ballot slots per voter.
pub const VOTE_SLOTS: usize = 3;

/// Points awarded by slot: first place 3, second 2, third 1.
pub const POINT_WEIGHTS: [u32; VOTE_SLOTS] = [3, 2, 1];

/// A voter's ranked picks. Slot index 0 is first place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Ranking {
    pub slots: [Option<String>; VOTE_SLOTS],
}

impl Ranking {
    pub fn new(first: &str, second: &str, third: &str) -> Self {
        Self {
            slots: [
                Some(first.to_string()),
                Some(second.to_string()),
                Some(third.to_string()),
            ],
        }
    }

    /// 1-based rank of an entry, if picked.
    pub fn rank_of(&self, entry_id: &str) -> Option<u8> {
        self.slots
            .iter()
            .position(|s| s.as_deref() == Some(entry_id))
            .map(|i| (i + 1) as u8)
    }

    pub fn entry_at(&self, rank: u8) -> Option<&str> {
        self.slots
            .get(rank.checked_sub(1)? as usize)
            .and_then(|s| s.as_deref())
    }

    pub fn selected_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// All slots filled with pairwise-distinct entries.
    pub fn is_complete(&self) -> bool {
        if self.selected_count() != VOTE_SLOTS {
            return false;
        }
        for i in 0..VOTE_SLOTS {
            for j in (i + 1)..VOTE_SLOTS {
                if self.slots[i] == self.slots[j] {
                    return false;
                }
            }
        }
        true
    }

    /// `(rank, entry_id)` pairs for every filled slot.
    pub fn iter_ranked(&self) -> impl Iterator<Item = (u8, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_deref().map(|id| ((i + 1) as u8, id)))
    }
}

/// A sealed ballot, keyed by voter id within its contest's vote collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Vote {
    pub voter_id: String,
    pub voter_name: String,
    pub ranking: Ranking,
    pub submitted_at: DateTime<Utc>,
}

/// Why a ranking was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RankingError {
    #[error("ranking must fill all {VOTE_SLOTS} slots")]
    Incomplete,
    #[error("entry '{0}' appears in more than one slot")]
    DuplicateEntry(String),
    #[error("entry '{0}' is not part of this contest")]
    UnknownEntry(String),
    #[error("cannot rank your own entry '{0}'")]
    OwnEntry(String),
}

/// Validate a ranking against the contest's entry set and the voter.
///
/// Checks, in order: completeness, slot distinctness, entry existence,
/// and self-vote rejection.
pub fn validate_ranking(
    ranking: &Ranking,
    entries: &[Entry],
    voter_id: &str,
) -> Result<(), RankingError> {
    if ranking.selected_count() != VOTE_SLOTS {
        return Err(RankingError::Incomplete);
    }
    for i in 0..VOTE_SLOTS {
        for j in (i + 1)..VOTE_SLOTS {
            if ranking.slots[i] == ranking.slots[j] {
                if let Some(id) = &ranking.slots[i] {
                    return Err(RankingError::DuplicateEntry(id.clone()));
                }
            }
        }
    }
    for (_, entry_id) in ranking.iter_ranked() {
        let entry = entries
            .iter()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| RankingError::UnknownEntry(entry_id.to_string()))?;
        if entry.photographer_id == voter_id {
            return Err(RankingError::OwnEntry(entry_id.to_string()));
        }
    }
    Ok(())
}
