use std::collections::HashMap;

use chrono::Utc;
use common::vote::{POINT_WEIGHTS, Ranking, validate_ranking};
use common::{Contest, UserRecord, Vote};
use livestore::StoreError;
use tracing::info;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

/// Accumulated counters for one entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub points: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

/// Fold every ballot into per-entry counters with 3/2/1 weighting.
pub fn tally(votes: &[Vote]) -> HashMap<String, Tally> {
    let mut counters: HashMap<String, Tally> = HashMap::new();
    for vote in votes {
        for (rank, entry_id) in vote.ranking.iter_ranked() {
            let t = counters.entry(entry_id.to_string()).or_default();
            t.points += POINT_WEIGHTS[(rank - 1) as usize];
            match rank {
                1 => t.gold += 1,
                2 => t.silver += 1,
                _ => t.bronze += 1,
            }
        }
    }
    counters
}

/// Seal a ballot. The write is create-if-absent keyed by voter id, so a
/// second submission from any device loses and the stored ranking stays
/// untouched.
pub async fn cast(
    state: &AppState,
    contest_id: &str,
    user: &AuthUser,
    ranking: Ranking,
) -> Result<Vote, AppError> {
    let contest = state
        .contests()?
        .get(contest_id)
        .filter(|c| c.visible_to(&user.viewer()))
        .ok_or_else(|| AppError::NotFound(format!("Contest '{contest_id}' not found")))?;

    if !contest.phase.accepts_votes() {
        return Err(AppError::Validation(format!(
            "Contest '{contest_id}' is not open for voting"
        )));
    }

    let entries = state.entries(contest_id)?.list();
    validate_ranking(&ranking, &entries, &user.user_id)?;

    let vote = Vote {
        voter_id: user.user_id.clone(),
        voter_name: user.display_name.clone(),
        ranking,
        submitted_at: Utc::now(),
    };

    match state.votes(contest_id)?.create(&user.user_id, vote.clone()) {
        Ok(()) => {
            info!(contest_id, voter = %user.display_name, "Ballot sealed");
            Ok(vote)
        }
        Err(StoreError::AlreadyExists { .. }) => Err(AppError::Duplicate(
            "You have already voted in this contest".into(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// The voter's stored ballot, if any. Drives cross-device rehydration.
pub fn my_vote(state: &AppState, contest_id: &str, voter_id: &str) -> Result<Option<Vote>, AppError> {
    Ok(state.votes(contest_id)?.get(voter_id))
}

/// Users in the contest's team scope, i.e. everyone who could cast a ballot.
pub fn eligible_voters(users: &[UserRecord], contest: &Contest) -> Vec<UserRecord> {
    users
        .iter()
        .filter(|u| contest.visible_to(&u.viewer()))
        .cloned()
        .collect()
}
