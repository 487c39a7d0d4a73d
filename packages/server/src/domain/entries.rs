use std::path::Path;
use std::str::FromStr;

use chrono::Utc;
use common::period::{MonthPeriod, boundaries};
use common::storage::BlobPath;
use common::{Contest, ContestPhase, Entry};
use livestore::StoreError;
use tracing::{info, warn};

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::state::AppState;

/// A photo upload after multipart parsing.
pub struct NewUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub order_num: Option<String>,
    pub photo_num: Option<String>,
}

/// Submit a photo to a contest.
///
/// Gate order: media type, size ceiling, contest resolution, upload cap,
/// metadata. Nothing is persisted until every gate has passed; only then
/// does a missing month get its record, the entry document reserve its id,
/// and the image land in blob storage.
pub async fn submit(
    state: &AppState,
    contest_id: &str,
    user: &AuthUser,
    upload: NewUpload,
) -> Result<Entry, AppError> {
    let accepted = &state.config.storage.accepted_media_types;
    if !accepted.iter().any(|t| t == &upload.content_type) {
        return Err(AppError::UnsupportedMediaType(format!(
            "'{}' uploads are not accepted (allowed: {})",
            upload.content_type,
            accepted.join(", ")
        )));
    }

    let limit = state.config.storage.max_upload_bytes;
    if upload.bytes.len() as u64 > limit {
        return Err(AppError::SizeLimit {
            actual: upload.bytes.len() as u64,
            limit,
        });
    }

    let contests = state.contests()?;
    let existing = match contests.get(contest_id) {
        Some(contest) => {
            if !contest.visible_to(&user.viewer()) {
                return Err(AppError::NotFound(format!(
                    "Contest '{contest_id}' not found"
                )));
            }
            if contest.phase != ContestPhase::SubmissionsOpen {
                return Err(AppError::Validation(format!(
                    "Contest '{contest_id}' is not accepting submissions"
                )));
            }
            Some(contest)
        }
        None => {
            materializable_period(contest_id)?;
            None
        }
    };

    let entries = state.entries(contest_id)?;
    let max = state.config.contest.max_entries_per_user;
    let mine = entries
        .list()
        .iter()
        .filter(|e| e.photographer_id == user.user_id)
        .count();
    if mine >= max {
        return Err(AppError::LimitExceeded(format!(
            "Upload cap of {max} entries reached for this contest"
        )));
    }

    // Materialized contests require metadata.
    let metadata_required = existing.as_ref().map_or(true, |c| c.metadata_required);
    if metadata_required && (upload.order_num.is_none() || upload.photo_num.is_none()) {
        return Err(AppError::Validation(
            "This contest requires order and photo numbers".into(),
        ));
    }

    // Every gate has passed; only now may a missing month grow a record.
    if existing.is_none() {
        materialize(state, contest_id, user)?;
    }

    // Ids carry millisecond timestamps; bump past any same-instant upload.
    // A concurrent upload can still win the id between the check and the
    // create, so the create reserves the id first and a conflict takes the
    // next slot instead of failing. Blob URLs are deterministic, so the
    // document can carry its URL before the image lands.
    let mut now = Utc::now();
    let (entry, path) = loop {
        let mut entry_id = Entry::derive_id(&user.display_name, now);
        while entries.contains(&entry_id) {
            now += chrono::Duration::milliseconds(1);
            entry_id = Entry::derive_id(&user.display_name, now);
        }
        let filename = storage_filename(&entry_id, &upload.filename);
        let path = BlobPath::new(contest_id, &user.user_id, &filename)?;

        let entry = Entry {
            id: entry_id.clone(),
            contest_id: contest_id.to_string(),
            photographer_id: user.user_id.clone(),
            photographer_name: user.display_name.clone(),
            team_id: user.team_id.clone(),
            url: path.url(),
            order_num: upload.order_num.clone(),
            photo_num: upload.photo_num.clone(),
            uploaded_at: now,
        };

        match entries.create(&entry_id, entry.clone()) {
            Ok(()) => break (entry, path),
            Err(StoreError::AlreadyExists { .. }) => {
                now += chrono::Duration::milliseconds(1);
            }
            Err(e) => return Err(e.into()),
        }
    };

    // The id is reserved; a failed image write releases it.
    if let Err(e) = state.blobs.put(&path, &upload.bytes).await {
        entries.delete(&entry.id);
        warn!(entry_id = %entry.id, error = %e, "Blob write failed, entry released");
        return Err(e.into());
    }

    info!(
        contest_id,
        entry_id = %entry.id,
        photographer = %user.display_name,
        "Entry submitted"
    );

    Ok(entry)
}

/// Withdraw an entry. Owners may withdraw while submissions are open;
/// admins may remove at any time.
pub async fn remove(
    state: &AppState,
    contest_id: &str,
    entry_id: &str,
    user: &AuthUser,
) -> Result<(), AppError> {
    let entries = state.entries(contest_id)?;
    let entry = entries
        .get(entry_id)
        .ok_or_else(|| AppError::NotFound(format!("Entry '{entry_id}' not found")))?;

    let is_owner = entry.photographer_id == user.user_id;
    if !is_owner && !user.role.can_manage() {
        return Err(AppError::PermissionDenied);
    }

    if !user.role.can_manage() {
        let contest = state
            .contests()?
            .get(contest_id)
            .ok_or_else(|| AppError::NotFound(format!("Contest '{contest_id}' not found")))?;
        if contest.phase != ContestPhase::SubmissionsOpen {
            return Err(AppError::Validation(
                "Entries can only be withdrawn while submissions are open".into(),
            ));
        }
    }

    entries.delete(entry_id);

    // Best effort: a stale blob is harmless, a lost entry document is not.
    if let Err(e) = state.blobs.delete(&entry.url).await {
        warn!(url = %entry.url, error = %e, "Failed to delete blob for withdrawn entry");
    }

    info!(contest_id, entry_id, "Entry withdrawn");
    Ok(())
}

/// The contest and its full entry list, with visibility enforced.
pub fn list(
    state: &AppState,
    contest_id: &str,
    user: &AuthUser,
) -> Result<(Contest, Vec<Entry>), AppError> {
    let contest = state
        .contests()?
        .get(contest_id)
        .filter(|c| c.visible_to(&user.viewer()))
        .ok_or_else(|| AppError::NotFound(format!("Contest '{contest_id}' not found")))?;
    let entries = state.entries(contest_id)?.list();
    Ok((contest, entries))
}

/// The month a missing contest id may lazily occupy. Only the current or
/// next calendar month can be materialized; anything else reads as missing.
fn materializable_period(contest_id: &str) -> Result<MonthPeriod, AppError> {
    let not_found = || AppError::NotFound(format!("Contest '{contest_id}' not found"));

    let period = MonthPeriod::from_str(contest_id).map_err(|_| not_found())?;
    let b = boundaries(Utc::now());
    if period != b.current && period != b.next {
        return Err(not_found());
    }
    Ok(period)
}

/// Create the contest record on first upload.
fn materialize(state: &AppState, contest_id: &str, user: &AuthUser) -> Result<Contest, AppError> {
    let period = materializable_period(contest_id)?;
    let contest = Contest::for_period(period, user.team_id.clone(), Utc::now());
    let contests = state.contests()?;
    match contests.create(contest_id, contest.clone()) {
        Ok(()) => {
            info!(contest_id, team = ?contest.team_id, "Contest materialized on first upload");
            Ok(contest)
        }
        // Concurrent first uploads race; the winner's record stands.
        Err(StoreError::AlreadyExists { .. }) => contests
            .get(contest_id)
            .ok_or_else(|| AppError::Internal("contest vanished after create conflict".into())),
        Err(e) => Err(e.into()),
    }
}

/// Stored filename: entry id plus the upload's extension.
fn storage_filename(entry_id: &str, original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("jpg");
    format!("{entry_id}.{ext}")
}
