use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::jobs::monthly::{TurnoverReport, run_monthly_turnover};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/admin/turnover",
    tag = "Admin",
    operation_id = "runTurnover",
    summary = "Run the monthly turnover pass now (admin)",
    description = "The same pass the scheduler runs on its tick. Safe to call repeatedly; a pass with nothing to do reports all fields null.",
    responses(
        (status = 200, description = "What the pass did", body = TurnoverReport),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn run_turnover(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TurnoverReport>, AppError> {
    auth_user.require_admin()?;
    let report = run_monthly_turnover(&state, Utc::now()).await?;
    Ok(Json(report))
}
