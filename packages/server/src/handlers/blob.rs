use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use common::storage::BlobPath;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/blobs/{contest_id}/{photographer_id}/{filename}",
    tag = "Blobs",
    operation_id = "getBlob",
    summary = "Serve a stored image",
    description = "The path mirrors the blob URL written into each entry. Team scoping applies: a member cannot fetch images of a contest they cannot see.",
    params(
        ("contest_id" = String, Path, description = "Contest id"),
        ("photographer_id" = String, Path, description = "Photographer user id"),
        ("filename" = String, Path, description = "Stored filename"),
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/jpeg"),
        (status = 404, description = "Unknown image or invisible contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %contest_id, filename = %filename))]
pub async fn get_blob(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((contest_id, photographer_id, filename)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, AppError> {
    // An invisible contest reads the same as a missing one.
    let visible = state
        .contests()?
        .get(&contest_id)
        .is_some_and(|c| c.visible_to(&auth_user.viewer()));
    if !visible {
        return Err(AppError::NotFound(format!(
            "Image '{contest_id}/{photographer_id}/{filename}' not found"
        )));
    }

    let path = BlobPath::new(&contest_id, &photographer_id, &filename)
        .map_err(|_| AppError::NotFound(format!("Image '{filename}' not found")))?;
    let bytes = state.blobs.get(&path.url()).await?;

    let content_type = mime_guess::from_path(&filename)
        .first_or_octet_stream()
        .to_string();

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}
