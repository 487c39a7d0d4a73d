use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::archive::{Archive, ArchiveStats, ScoredEntry, Winners};
use common::{Contest, ContestPhase, Entry, Vote};
use livestore::StoreError;
use tracing::{info, warn};

use crate::domain::votes;
use crate::error::AppError;
use crate::models::archive::LeaderboardRow;
use crate::state::AppState;

/// Seal a voting contest: tally, rank, write the archive, flip the phase.
///
/// Idempotent. If the archive already exists the stored record is returned
/// as-is; a contest left in `Voting` next to an existing archive (a
/// half-applied earlier run) gets its phase flip retried.
pub async fn finalize(
    state: &AppState,
    contest_id: &str,
    now: DateTime<Utc>,
) -> Result<Archive, AppError> {
    let contests = state.contests()?;
    let archives = state.archives()?;

    if let Some(existing) = archives.get(contest_id) {
        repair_phase_flip(state, contest_id, now)?;
        return Ok(existing);
    }

    let contest = contests
        .get(contest_id)
        .ok_or_else(|| AppError::NotFound(format!("Contest '{contest_id}' not found")))?;
    if contest.phase != ContestPhase::Voting {
        return Err(AppError::Validation(format!(
            "Contest '{contest_id}' is not in the voting phase"
        )));
    }

    let entries = state.entries(contest_id)?.list();
    let ballots = state.votes(contest_id)?.list();
    let scored = score_entries(entries, &ballots);
    let winners = podium(&scored);
    let eligible = votes::eligible_voters(&state.users()?.list(), &contest).len();

    let archive = Archive {
        id: contest_id.to_string(),
        display_name: contest.display_name.clone(),
        winners,
        entries: scored,
        stats: ArchiveStats {
            votes_cast: ballots.len() as u32,
            eligible_voters: eligible as u32,
        },
        archived_at: now,
        images_purged: false,
    };

    match archives.create(contest_id, archive.clone()) {
        Ok(()) => {}
        // Lost a concurrent finalize; the winner's archive stands.
        Err(StoreError::AlreadyExists { .. }) => {
            repair_phase_flip(state, contest_id, now)?;
            return archives
                .get(contest_id)
                .ok_or_else(|| AppError::Internal("archive vanished after create conflict".into()));
        }
        Err(e) => return Err(e.into()),
    }

    if let Err(e) = contests.update(contest_id, |c| {
        c.phase = ContestPhase::Archived;
        c.archived_at = Some(now);
    }) {
        // The archive is written; the next finalize call repairs the flip.
        warn!(contest_id, error = %e, "Archive written but phase flip failed");
    }

    info!(
        contest_id,
        entries = archive.entries.len(),
        votes_cast = archive.stats.votes_cast,
        "Contest archived"
    );

    Ok(archive)
}

fn repair_phase_flip(
    state: &AppState,
    contest_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let contests = state.contests()?;
    if let Some(contest) = contests.get(contest_id) {
        if !contest.phase.is_terminal() {
            warn!(contest_id, "Repairing phase flip for already-archived contest");
            contests.update(contest_id, |c| {
                c.phase = ContestPhase::Archived;
                c.archived_at = Some(now);
            })?;
        }
    }
    Ok(())
}

/// Mark a submissions-open month as skipped. Already-skipped is a no-op.
pub fn skip(state: &AppState, contest_id: &str) -> Result<Contest, AppError> {
    let contests = state.contests()?;
    let contest = contests
        .get(contest_id)
        .ok_or_else(|| AppError::NotFound(format!("Contest '{contest_id}' not found")))?;
    match contest.phase {
        ContestPhase::Skipped => Ok(contest),
        ContestPhase::SubmissionsOpen => {
            let updated = contests.update(contest_id, |c| c.phase = ContestPhase::Skipped)?;
            info!(contest_id, "Contest skipped");
            Ok(updated)
        }
        _ => Err(AppError::Validation(format!(
            "Only submissions-open contests can be skipped, '{contest_id}' is {}",
            contest.phase
        ))),
    }
}

/// Score every entry (zero-vote entries included at 0 points) and sort
/// into final standing order: points, then golds, silvers, bronzes, with
/// entry id as the stable last resort.
pub fn score_entries(entries: Vec<Entry>, ballots: &[Vote]) -> Vec<ScoredEntry> {
    let counters = votes::tally(ballots);
    let mut scored: Vec<ScoredEntry> = entries
        .into_iter()
        .map(|entry| {
            let t = counters.get(&entry.id).copied().unwrap_or_default();
            ScoredEntry {
                entry,
                points: t.points,
                gold: t.gold,
                silver: t.silver,
                bronze: t.bronze,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score_key()
            .cmp(&a.score_key())
            .then_with(|| a.entry.id.cmp(&b.entry.id))
    });
    scored
}

/// Top three of the standing order; missing places stay `None`.
pub fn podium(scored: &[ScoredEntry]) -> Winners {
    Winners {
        gold: scored.first().map(|s| s.entry.id.clone()),
        silver: scored.get(1).map(|s| s.entry.id.clone()),
        bronze: scored.get(2).map(|s| s.entry.id.clone()),
    }
}

/// All-time standings folded from the archives. Points come from every
/// scored entry; medal counts from podium placements.
pub fn leaderboard(archives: &[Archive]) -> Vec<LeaderboardRow> {
    let mut rows: HashMap<String, LeaderboardRow> = HashMap::new();

    for archive in archives {
        let by_id: HashMap<&str, &ScoredEntry> = archive
            .entries
            .iter()
            .map(|s| (s.entry.id.as_str(), s))
            .collect();

        for scored in &archive.entries {
            let row = rows
                .entry(scored.entry.photographer_id.clone())
                .or_insert_with(|| LeaderboardRow {
                    photographer_id: scored.entry.photographer_id.clone(),
                    photographer_name: scored.entry.photographer_name.clone(),
                    points: 0,
                    gold: 0,
                    silver: 0,
                    bronze: 0,
                    entries: 0,
                });
            row.points += scored.points;
            row.entries += 1;
        }

        for (place, winner) in [
            (0usize, &archive.winners.gold),
            (1, &archive.winners.silver),
            (2, &archive.winners.bronze),
        ] {
            if let Some(scored) = winner.as_deref().and_then(|id| by_id.get(id)) {
                if let Some(row) = rows.get_mut(&scored.entry.photographer_id) {
                    match place {
                        0 => row.gold += 1,
                        1 => row.silver += 1,
                        _ => row.bronze += 1,
                    }
                }
            }
        }
    }

    let mut rows: Vec<LeaderboardRow> = rows.into_values().collect();
    rows.sort_by(|a, b| {
        (b.points, b.gold, b.silver, b.bronze)
            .cmp(&(a.points, a.gold, a.silver, a.bronze))
            .then_with(|| a.photographer_name.cmp(&b.photographer_name))
    });
    rows
}

/// Reclaim the image storage of an archived contest. Entry URLs in the
/// archive record are blanked so clients stop rendering them.
pub async fn purge_images(state: &AppState, archive_id: &str) -> Result<Archive, AppError> {
    let archives = state.archives()?;
    let archive = archives
        .get(archive_id)
        .ok_or_else(|| AppError::NotFound(format!("Archive '{archive_id}' not found")))?;
    if archive.images_purged {
        return Ok(archive);
    }

    state.blobs.delete_contest(archive_id).await?;

    let updated = archives.update(archive_id, |a| {
        a.images_purged = true;
        for scored in &mut a.entries {
            scored.entry.url = String::new();
        }
    })?;

    info!(archive_id, "Archive images purged");
    Ok(updated)
}
