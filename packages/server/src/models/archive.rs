use chrono::{DateTime, Utc};
use common::archive::{Archive, Winners};
use serde::Serialize;

/// One row in the archive listing.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ArchiveSummary {
    pub id: String,
    pub display_name: String,
    pub winners: Winners,
    pub entry_count: usize,
    pub votes_cast: u32,
    pub archived_at: DateTime<Utc>,
    pub images_purged: bool,
}

impl From<&Archive> for ArchiveSummary {
    fn from(archive: &Archive) -> Self {
        Self {
            id: archive.id.clone(),
            display_name: archive.display_name.clone(),
            winners: archive.winners.clone(),
            entry_count: archive.entries.len(),
            votes_cast: archive.stats.votes_cast,
            archived_at: archive.archived_at,
            images_purged: archive.images_purged,
        }
    }
}

/// All-time standing of one photographer, folded from the archives.
#[derive(Serialize, Clone, Debug, PartialEq, Eq, utoipa::ToSchema)]
pub struct LeaderboardRow {
    pub photographer_id: String,
    pub photographer_name: String,
    pub points: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    /// Entries submitted across all archived contests.
    pub entries: u32,
}
