use axum::Json;
use axum::extract::{Path, State};
use common::archive::Archive;
use tracing::instrument;

use crate::domain::archive;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::archive::{ArchiveSummary, LeaderboardRow};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/archives",
    tag = "Archives",
    operation_id = "listArchives",
    summary = "Sealed contests, newest first",
    responses(
        (status = 200, description = "Archive summaries", body = [ArchiveSummary]),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_archives(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ArchiveSummary>>, AppError> {
    let mut archives = state.archives()?.list();
    archives.sort_by(|a, b| b.archived_at.cmp(&a.archived_at).then_with(|| b.id.cmp(&a.id)));
    Ok(Json(archives.iter().map(ArchiveSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/archives/{id}",
    tag = "Archives",
    operation_id = "getArchive",
    summary = "Full results of a sealed contest",
    params(("id" = String, Path, description = "Archive id")),
    responses(
        (status = 200, description = "Archive record", body = Archive),
        (status = 404, description = "Unknown archive (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(archive_id = %id))]
pub async fn get_archive(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Archive>, AppError> {
    let archive = state
        .archives()?
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Archive '{id}' not found")))?;
    Ok(Json(archive))
}

#[utoipa::path(
    delete,
    path = "/api/v1/archives/{id}/images",
    tag = "Archives",
    operation_id = "purgeArchiveImages",
    summary = "Reclaim an archived contest's image storage (admin)",
    params(("id" = String, Path, description = "Archive id")),
    responses(
        (status = 200, description = "Archive with blanked URLs (idempotent)", body = Archive),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown archive (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(archive_id = %id))]
pub async fn purge_archive_images(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Archive>, AppError> {
    auth_user.require_admin()?;
    let archive = archive::purge_images(&state, &id).await?;
    Ok(Json(archive))
}

#[utoipa::path(
    get,
    path = "/api/v1/leaderboard",
    tag = "Archives",
    operation_id = "leaderboard",
    summary = "All-time standings folded from the archives",
    responses(
        (status = 200, description = "Rows in standing order", body = [LeaderboardRow]),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn leaderboard(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LeaderboardRow>>, AppError> {
    let archives = state.archives()?.list();
    Ok(Json(archive::leaderboard(&archives)))
}
