use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::Vote;
use tracing::instrument;

use crate::domain::votes;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::vote::{CastVoteRequest, MyVoteResponse, VoteProgressResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/contests/{id}/votes",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Seal a ranked ballot",
    description = "Three distinct entries, ranked. First write wins; a second ballot from any device is rejected and the stored one stands.",
    params(("id" = String, Path, description = "Contest id")),
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Ballot sealed", body = Vote),
        (status = 400, description = "Invalid ranking or voting closed (VALIDATION_ERROR, SELF_VOTE)", body = ErrorBody),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already voted (DUPLICATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(contest_id = %id, user_id = %auth_user.user_id))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<CastVoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let vote = votes::cast(&state, &id, &auth_user, payload.ranking).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contests/{id}/votes/me",
    tag = "Votes",
    operation_id = "myVote",
    summary = "The viewer's ballot state in a contest",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Ballot state", body = MyVoteResponse),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id, user_id = %auth_user.user_id))]
pub async fn my_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MyVoteResponse>, AppError> {
    let vote = votes::my_vote(&state, &id, &auth_user.user_id)?;
    Ok(Json(MyVoteResponse {
        voted: vote.is_some(),
        ranking: vote.map(|v| v.ranking),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/contests/{id}/votes/progress",
    tag = "Votes",
    operation_id = "voteProgress",
    summary = "Who has voted so far (admin)",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Roster", body = VoteProgressResponse),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id))]
pub async fn vote_progress(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VoteProgressResponse>, AppError> {
    auth_user.require_admin()?;

    let contest = state
        .contests()?
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Contest '{id}' not found")))?;

    let ballots = state.votes(&id)?.list();
    let eligible = votes::eligible_voters(&state.users()?.list(), &contest);

    let mut voted: Vec<String> = ballots.iter().map(|v| v.voter_name.clone()).collect();
    voted.sort();
    let mut pending: Vec<String> = eligible
        .iter()
        .filter(|u| !ballots.iter().any(|v| v.voter_id == u.id))
        .map(|u| u.display_name.clone())
        .collect();
    pending.sort();

    Ok(Json(VoteProgressResponse {
        votes_cast: ballots.len() as u32,
        eligible_voters: eligible.len() as u32,
        voted,
        pending,
    }))
}
