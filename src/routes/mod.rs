pub mod banners;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::auth::JwtSecret;
use crate::AppState;

pub fn app(state: AppState) -> Router {
    let jwt_secret = JwtSecret(state.config.jwt_secret.clone());

    Router::new()
        .route("/health", get(health::health_check))
        // Public read path
        .route("/banners/active", get(banners::active_banners))
        .route("/banners/active/first", get(banners::first_active_banner))
        // Admin resource
        .route(
            "/banners",
            get(banners::search_banners).post(banners::create_banner),
        )
        .route("/banners/disable-expired", post(banners::disable_expired))
        .route(
            "/banners/{id}",
            get(banners::read_banner)
                .put(banners::update_banner)
                .delete(banners::delete_banner),
        )
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
