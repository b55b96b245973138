pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/version", get(routes::version))
        .route("/api/v1/sentiment", get(routes::sentiment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
