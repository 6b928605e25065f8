pub mod error;
pub mod routes;

use axum::routing::{get, post, put};
use axum::Router;
use pollflow_core::AppState;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn build_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/polls",
            get(routes::polls::list_polls).post(routes::polls::create_poll),
        )
        .route("/api/polls/{id}", get(routes::polls::get_poll))
        .route("/api/polls/{id}/vote", put(routes::polls::cast_vote))
        .route("/api/polls/{id}/answer", post(routes::polls::submit_answer))
        .route("/api/polls/{id}/analyze", post(routes::polls::analyze))
        .route("/api/polls/{id}/report", get(routes::polls::report))
        .route("/api/chat/respond", post(routes::chat::respond))
        .route("/api/chat/summary", post(routes::chat::summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
