use common::{Contest, ContestPhase, Entry, Viewer};

use crate::ballot::BallotDraft;

/// One photo card in the gallery.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub entry_id: String,
    pub url: String,
    /// 1-based rank this entry holds in the viewer's draft, if any.
    pub rank: Option<u8>,
    /// Present only for the viewer's own entries or once the contest
    /// is archived.
    pub photographer_name: Option<String>,
    pub mine: bool,
    /// Own entries cannot be ranked; neither can anything once locked.
    pub selectable: bool,
}

/// The gallery as the viewer should see it.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryView {
    pub items: Vec<GalleryItem>,
    /// Ranking is closed: the ballot is sealed or the phase forbids it.
    pub locked: bool,
}

impl GalleryView {
    /// Derive the view from already-arranged entries and the draft state.
    pub fn derive(
        contest: &Contest,
        entries: &[Entry],
        viewer: &Viewer,
        draft: &BallotDraft,
        voted: bool,
    ) -> Self {
        let locked = voted || !contest.phase.accepts_votes();
        let revealed = contest.phase == ContestPhase::Archived;

        let items = entries
            .iter()
            .map(|entry| {
                let mine = entry.photographer_id == viewer.user_id;
                GalleryItem {
                    entry_id: entry.id.clone(),
                    url: entry.url.clone(),
                    rank: draft.rank_of(&entry.id),
                    photographer_name: (mine || revealed)
                        .then(|| entry.photographer_name.clone()),
                    mine,
                    selectable: !locked && !mine,
                }
            })
            .collect();

        Self { items, locked }
    }
}
