use chrono::{DateTime, Utc};
use common::{Contest, ContestPhase, period};
use livestore::StoreError;
use serde::Serialize;
use tracing::{error, info};

use crate::domain::archive;
use crate::error::AppError;
use crate::state::AppState;

/// What one turnover pass did. Every field is `None` when the step found
/// nothing to do, so repeated runs in the same month report all-quiet.
#[derive(Clone, Debug, Default, Serialize, utoipa::ToSchema)]
pub struct TurnoverReport {
    /// Contest sealed by step one, if any.
    pub archived: Option<String>,
    /// Contest promoted to voting by step two, if any.
    pub promoted: Option<String>,
    /// Contest created for the upcoming month by step three, if any.
    pub created: Option<String>,
}

/// Background loop driving the monthly turnover on a fixed tick.
///
/// Each tick runs a full pass. The pass itself is idempotent, so the tick
/// interval only bounds how late a turnover can land after midnight.
pub async fn run_monthly_scheduler(state: AppState) {
    let tick = std::time::Duration::from_secs(state.config.scheduler.tick_interval_secs);
    info!(interval_secs = tick.as_secs(), "Monthly scheduler started");
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        match run_monthly_turnover(&state, Utc::now()).await {
            Ok(report) => {
                if report.archived.is_some()
                    || report.promoted.is_some()
                    || report.created.is_some()
                {
                    info!(
                        archived = ?report.archived,
                        promoted = ?report.promoted,
                        created = ?report.created,
                        "Monthly turnover applied"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Monthly turnover pass failed");
            }
        }
    }
}

/// One turnover pass around `now`, in three independent steps:
///
/// 1. seal last month's contest if it is still collecting votes,
/// 2. promote this month's contest from submissions to voting,
/// 3. make sure next month's contest exists.
///
/// Steps only touch scheduler-keyed (`YYYY-MM`) contests and each step
/// tolerates the others having already happened, so a crash mid-pass is
/// healed by the next tick.
pub async fn run_monthly_turnover(
    state: &AppState,
    now: DateTime<Utc>,
) -> Result<TurnoverReport, AppError> {
    let bounds = period::boundaries(now);
    let contests = state.contests()?;
    let mut report = TurnoverReport::default();

    let prev_key = bounds.previous.key();
    if let Some(prev) = contests.get(&prev_key) {
        if prev.phase == ContestPhase::Voting {
            archive::finalize(state, &prev_key, now).await?;
            report.archived = Some(prev_key);
        }
    }

    let current_key = bounds.current.key();
    if let Some(current) = contests.get(&current_key) {
        if current.phase == ContestPhase::SubmissionsOpen {
            contests.update(&current_key, |c| {
                c.phase = ContestPhase::Voting;
                c.voting_started_at = Some(now);
            })?;
            info!(contest_id = %current_key, "Contest promoted to voting");
            report.promoted = Some(current_key);
        }
    }

    let next_key = bounds.next.key();
    if !contests.contains(&next_key) {
        let contest = Contest::for_period(bounds.next, None, now);
        match contests.create(&next_key, contest) {
            Ok(()) => {
                info!(contest_id = %next_key, "Contest created for upcoming month");
                report.created = Some(next_key);
            }
            // Lost a race with a lazy materialization; same outcome.
            Err(StoreError::AlreadyExists { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(report)
}
