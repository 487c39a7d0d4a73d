use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/contests", contest_routes(config))
        .nest("/archives", archive_routes())
        .nest("/users", user_routes())
        .nest("/admin", admin_routes())
        .nest("/blobs", blob_routes())
        .route("/leaderboard", get(handlers::archive::leaderboard))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/me", get(handlers::auth::me))
}

fn contest_routes(config: &AppConfig) -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::contest::create_contest))
        .route("/active", get(handlers::contest::active_contests))
        .route("/{id}/finalize", post(handlers::contest::finalize_contest))
        .route("/{id}/skip", post(handlers::contest::skip_contest))
        .nest("/{id}/entries", entry_routes(config))
        .nest("/{id}/votes", vote_routes())
}

fn entry_routes(config: &AppConfig) -> Router<AppState> {
    let reads = Router::new()
        .route("/", get(handlers::entry::list_gallery))
        .route("/mine", get(handlers::entry::list_my_entries))
        .route("/{entry_id}", delete(handlers::entry::withdraw_entry));

    let upload = Router::new()
        .route("/", post(handlers::entry::submit_entry))
        .layer(handlers::entry::upload_body_limit(
            config.storage.max_upload_bytes,
        ));

    reads.merge(upload)
}

fn vote_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::vote::cast_vote))
        .route("/me", get(handlers::vote::my_vote))
        .route("/progress", get(handlers::vote::vote_progress))
}

fn archive_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::archive::list_archives))
        .route("/{id}", get(handlers::archive::get_archive))
        .route("/{id}/images", delete(handlers::archive::purge_archive_images))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::user::list_users).post(handlers::user::create_user),
        )
        .route("/{id}", delete(handlers::user::delete_user))
}

fn admin_routes() -> Router<AppState> {
    Router::new().route("/turnover", post(handlers::admin::run_turnover))
}

fn blob_routes() -> Router<AppState> {
    Router::new().route(
        "/{contest_id}/{photographer_id}/{filename}",
        get(handlers::blob::get_blob),
    )
}
