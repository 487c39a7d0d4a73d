use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::Entry;
use tracing::instrument;

use crate::domain::entries::{self, NewUpload};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::entry::GalleryEntry;
use crate::state::AppState;

/// Request body ceiling for uploads: the image limit plus multipart
/// framing headroom.
pub fn upload_body_limit(max_upload_bytes: u64) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_upload_bytes as usize + 64 * 1024)
}

#[utoipa::path(
    post,
    path = "/api/v1/contests/{id}/entries",
    tag = "Entries",
    operation_id = "submitEntry",
    summary = "Upload a photo to a contest",
    description = "Multipart upload with a `photo` file part and optional `order_num` / `photo_num` text parts. Uploading to a month with no contest record materializes it.",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 201, description = "Entry created", body = Entry),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 409, description = "Upload cap reached (LIMIT_EXCEEDED)", body = ErrorBody),
        (status = 413, description = "Image too large (SIZE_LIMIT)", body = ErrorBody),
        (status = 415, description = "Not an accepted media type (UNSUPPORTED_MEDIA_TYPE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(contest_id = %id, user_id = %auth_user.user_id))]
pub async fn submit_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = parse_upload(multipart).await?;
    let entry = entries::submit(&state, &id, &auth_user, upload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contests/{id}/entries",
    tag = "Entries",
    operation_id = "listGallery",
    summary = "Gallery of a contest, attribution withheld while live",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Entries in upload order", body = [GalleryEntry]),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id))]
pub async fn list_gallery(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GalleryEntry>>, AppError> {
    let (contest, mut entries) = entries::list(&state, &id, &auth_user)?;
    entries.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then_with(|| a.id.cmp(&b.id)));
    let gallery = entries
        .iter()
        .map(|e| GalleryEntry::for_viewer(e, &auth_user.user_id, contest.phase))
        .collect();
    Ok(Json(gallery))
}

#[utoipa::path(
    get,
    path = "/api/v1/contests/{id}/entries/mine",
    tag = "Entries",
    operation_id = "listMyEntries",
    summary = "The viewer's own entries in a contest",
    params(("id" = String, Path, description = "Contest id")),
    responses(
        (status = 200, description = "Entries", body = [Entry]),
        (status = 404, description = "Unknown contest (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id, user_id = %auth_user.user_id))]
pub async fn list_my_entries(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let (_, entries) = entries::list(&state, &id, &auth_user)?;
    let mine = entries
        .into_iter()
        .filter(|e| e.photographer_id == auth_user.user_id)
        .collect();
    Ok(Json(mine))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contests/{id}/entries/{entry_id}",
    tag = "Entries",
    operation_id = "withdrawEntry",
    summary = "Withdraw an entry",
    params(
        ("id" = String, Path, description = "Contest id"),
        ("entry_id" = String, Path, description = "Entry id"),
    ),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 400, description = "Submissions closed (VALIDATION_ERROR)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Unknown entry (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(contest_id = %id, entry_id = %entry_id))]
pub async fn withdraw_entry(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((id, entry_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    entries::remove(&state, &id, &entry_id, &auth_user).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pull the photo part and metadata fields out of a multipart body.
async fn parse_upload(mut multipart: Multipart) -> Result<NewUpload, AppError> {
    let mut photo: Option<(String, String, Vec<u8>)> = None;
    let mut order_num = None;
    let mut photo_num = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "photo" => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_string();
                let content_type = field
                    .content_type()
                    .map(String::from)
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&filename)
                            .first_or_octet_stream()
                            .to_string()
                    });
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;
                photo = Some((filename, content_type, bytes.to_vec()));
            }
            "order_num" => {
                order_num = Some(read_text_field(field).await?);
            }
            "photo_num" => {
                photo_num = Some(read_text_field(field).await?);
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) = photo
        .ok_or_else(|| AppError::Validation("Missing 'photo' file part".into()))?;

    Ok(NewUpload {
        filename,
        content_type,
        bytes,
        order_num: order_num.filter(|s: &String| !s.trim().is_empty()),
        photo_num: photo_num.filter(|s: &String| !s.trim().is_empty()),
    })
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed text field: {e}")))
}
