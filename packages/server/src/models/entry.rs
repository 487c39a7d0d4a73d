use chrono::{DateTime, Utc};
use common::{ContestPhase, Entry};
use serde::Serialize;

/// An entry as shown in the gallery. Attribution is withheld while the
/// contest is live so ballots stay blind.
#[derive(Serialize, utoipa::ToSchema)]
pub struct GalleryEntry {
    pub id: String,
    pub url: String,
    pub order_num: Option<String>,
    pub photo_num: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    /// Present only for the viewer's own entries or once the contest
    /// is archived.
    pub photographer_name: Option<String>,
    /// Whether the viewer authored this entry.
    pub mine: bool,
}

impl GalleryEntry {
    pub fn for_viewer(entry: &Entry, viewer_id: &str, phase: ContestPhase) -> Self {
        let mine = entry.photographer_id == viewer_id;
        let attributed = mine || phase == ContestPhase::Archived;
        Self {
            id: entry.id.clone(),
            url: entry.url.clone(),
            order_num: entry.order_num.clone(),
            photo_num: entry.photo_num.clone(),
            uploaded_at: entry.uploaded_at,
            photographer_name: attributed.then(|| entry.photographer_name.clone()),
            mine,
        }
    }
}
