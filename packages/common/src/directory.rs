//! Contest selection over a full directory snapshot.
//!
//! Both the server handlers and the client session derive their targets
//! from the same snapshot, so the selection rules live here. Every
//! function takes the complete contest list; an empty result is a valid
//! steady state, not an error.

use chrono::{DateTime, Utc};

use crate::contest::Contest;
use crate::period::MonthPeriod;
use crate::phase::ContestPhase;
use crate::user::Viewer;

/// Newest-first ordering: creation time, then id as tie-break.
fn newest_first(a: &Contest, b: &Contest) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Contests the user can currently see and interact with, newest first.
pub fn active_contests(contests: &[Contest], viewer: &Viewer) -> Vec<Contest> {
    let mut active: Vec<Contest> = contests
        .iter()
        .filter(|c| c.phase.is_active() && c.visible_to(viewer))
        .cloned()
        .collect();
    active.sort_by(newest_first);
    active
}

/// The latest voting contest visible to the user, if any.
pub fn voting_target(contests: &[Contest], viewer: &Viewer) -> Option<Contest> {
    contests
        .iter()
        .filter(|c| c.phase == ContestPhase::Voting && c.visible_to(viewer))
        .min_by(|a, b| newest_first(a, b))
        .cloned()
}

/// Where an upload would land right now.
///
/// A persisted submissions-open contest wins; otherwise a virtual target
/// for the next calendar month is synthesized so uploads always have a
/// destination.
pub fn submission_target(contests: &[Contest], viewer: &Viewer, now: DateTime<Utc>) -> Contest {
    contests
        .iter()
        .filter(|c| c.phase == ContestPhase::SubmissionsOpen && c.visible_to(viewer))
        .min_by(|a, b| newest_first(a, b))
        .cloned()
        .unwrap_or_else(|| {
            Contest::virtual_for(MonthPeriod::from_datetime(now).next(), now)
        })
}
