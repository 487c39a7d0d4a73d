use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use common::archive::Archive;
use common::{Contest, directory};
use tracing::instrument;

use crate::domain::archive;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contest::{ActiveContestsResponse, CreateContestRequest, validate_create_contest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/contests/active",
    tag = "Contests",
    operation_id = "activeContests",
    summary = "Team-scoped snapshot of live contests and upload target",
    responses(
        (status = 200, description = "Current directory state", body = ActiveContestsResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn active_contests(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ActiveContestsResponse>, AppError> {
    let snapshot = state.contests()?.list();
    let viewer = auth_user.viewer();
    let now = Utc::now();

    Ok(Json(ActiveContestsResponse {
        contests: directory::active_contests(&snapshot, &viewer),
        voting_target: directory::voting_target(&snapshot, &viewer),
        submission_target: directory::submission_target(&snapshot, &viewer, now),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/contests",
    tag = "Contests",
    operation_id = "createContest",
    summary = "Create an ad-hoc contest",
    request_body = CreateContestRequest,
    responses(
        (status = 201, description = "Contest created", body = Contest),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Id already in use (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id = %payload.id))]
pub async fn create_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateContestRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_contest(&payload)?;

    let contest = Contest {
        id: payload.id.trim().to_string(),
        display_name: payload.display_name.trim().to_string(),
        phase: common::ContestPhase::SubmissionsOpen,
        team_id: payload.team_id,
        metadata_required: payload.metadata_required.unwrap_or(true),
        created_at: Utc::now(),
        voting_started_at: None,
        archived_at: None,
    };

    state.contests()?.create(&contest.id, contest.clone())?;

    Ok((StatusCode::CREATED, Json(contest)))
}

#[utoipa::path(
    post,
    path = "/api/v1/contests/{id}/finalize",
    tag = "Contests",
    operation_id = "finalizeContest",
    summary = "Tally, archive, and seal a voting contest",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Archive record (idempotent)", body = Archive),
        (status = 400, description = "Contest not in voting (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id))]
pub async fn finalize_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Archive>, AppError> {
    auth_user.require_admin()?;
    let archive = archive::finalize(&state, &id, Utc::now()).await?;
    Ok(Json(archive))
}

#[utoipa::path(
    post,
    path = "/api/v1/contests/{id}/skip",
    tag = "Contests",
    operation_id = "skipContest",
    summary = "Mark a submissions-open month as skipped",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Skipped contest (idempotent)", body = Contest),
        (status = 400, description = "Contest past submissions (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id))]
pub async fn skip_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contest>, AppError> {
    auth_user.require_admin()?;
    let contest = archive::skip(&state, &id)?;
    Ok(Json(contest))
}
