use chrono::{DateTime, Utc};
use common::{Contest, Entry, Viewer, Vote, directory, paths};
use livestore::{LiveQuery, Store};
use tracing::debug;

use crate::error::ClientError;
use crate::shuffle::ShuffleCache;

/// The contest directory as the viewer should see it right now.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectoryView {
    /// Visible active contests, newest first.
    pub contests: Vec<Contest>,
    pub voting_target: Option<Contest>,
    pub submission_target: Contest,
}

/// A viewer's live connection to the store.
///
/// The session subscribes to the contests the viewer can see and derives
/// the same directory targets the server hands out, so a reconnecting
/// client converges on identical state.
pub struct Session {
    store: Store,
    viewer: Viewer,
    contests: LiveQuery<Contest>,
}

impl Session {
    pub fn open(store: Store, viewer: Viewer) -> Result<Self, ClientError> {
        let filter_viewer = viewer.clone();
        let contests = store
            .collection::<Contest>(paths::CONTESTS)?
            .watch(move |c| c.visible_to(&filter_viewer));
        Ok(Self {
            store,
            viewer,
            contests,
        })
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Current directory view, marking the underlying snapshot seen.
    pub fn directory(&mut self, now: DateTime<Utc>) -> DirectoryView {
        let snapshot = self.contests.snapshot();
        DirectoryView {
            contests: directory::active_contests(&snapshot, &self.viewer),
            voting_target: directory::voting_target(&snapshot, &self.viewer),
            submission_target: directory::submission_target(&snapshot, &self.viewer, now),
        }
    }

    /// Wait for any visible contest to change. Returns `false` if the
    /// store went away.
    pub async fn directory_changed(&mut self) -> bool {
        self.contests.changed().await
    }

    /// Subscribe to a contest's gallery with the display shuffle applied.
    pub fn gallery(&self, contest_id: &str) -> Result<GalleryFeed, ClientError> {
        let entries = self
            .store
            .collection::<Entry>(&paths::entries(contest_id))?
            .watch_all();
        debug!(contest_id, "Gallery feed opened");
        Ok(GalleryFeed {
            contest_id: contest_id.to_string(),
            entries,
            shuffle: ShuffleCache::new(),
        })
    }

    /// Subscribe to the viewer's own sealed ballot in a contest.
    ///
    /// The query's snapshot is empty until the ballot lands (possibly
    /// from another device) and holds exactly one vote afterwards.
    pub fn my_ballot(&self, contest_id: &str) -> Result<LiveQuery<Vote>, ClientError> {
        let voter_id = self.viewer.user_id.clone();
        let votes = self
            .store
            .collection::<Vote>(&paths::votes(contest_id))?
            .watch(move |v| v.voter_id == voter_id);
        Ok(votes)
    }
}

/// A live gallery for one contest, in pinned shuffle order.
pub struct GalleryFeed {
    contest_id: String,
    entries: LiveQuery<Entry>,
    shuffle: ShuffleCache,
}

impl GalleryFeed {
    pub fn contest_id(&self) -> &str {
        &self.contest_id
    }

    /// Latest entries in display order, marking the snapshot seen.
    pub fn current(&mut self) -> Vec<Entry> {
        let snapshot = self.entries.snapshot();
        self.shuffle.arrange(&self.contest_id, &snapshot)
    }

    /// Wait for the entry set to change.
    pub async fn changed(&mut self) -> bool {
        self.entries.changed().await
    }
}
