pub mod config;
pub mod domain;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod seed;
pub mod state;
pub mod utils;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Darkroom API",
        version = "1.0.0",
        description = "API for the Darkroom monthly photo contest"
    ),
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::contest::active_contests,
        handlers::contest::create_contest,
        handlers::contest::finalize_contest,
        handlers::contest::skip_contest,
        handlers::entry::submit_entry,
        handlers::entry::list_gallery,
        handlers::entry::list_my_entries,
        handlers::entry::withdraw_entry,
        handlers::vote::cast_vote,
        handlers::vote::my_vote,
        handlers::vote::vote_progress,
        handlers::archive::list_archives,
        handlers::archive::get_archive,
        handlers::archive::purge_archive_images,
        handlers::archive::leaderboard,
        handlers::user::create_user,
        handlers::user::list_users,
        handlers::user::delete_user,
        handlers::admin::run_turnover,
        handlers::blob::get_blob,
    ),
    tags(
        (name = "Auth", description = "Login and session identity"),
        (name = "Contests", description = "Contest lifecycle and directory"),
        (name = "Entries", description = "Photo uploads and galleries"),
        (name = "Votes", description = "Ranked ballots"),
        (name = "Archives", description = "Sealed results and the leaderboard"),
        (name = "Users", description = "Account management"),
        (name = "Admin", description = "Operational endpoints"),
        (name = "Blobs", description = "Image serving"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    let router = axum::Router::new()
        .nest("/api", routes::api_routes(&state.config))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    match cors {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

/// CORS layer from config; `None` when no origins are allowed.
fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if config.allow_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(config.max_age)),
    )
}
