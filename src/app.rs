use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/records",
            get(handlers::list_records)
                .post(handlers::create_record)
                .delete(handlers::delete_all_records),
        )
        .route(
            "/api/records/:id",
            put(handlers::update_record).delete(handlers::delete_record),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/health-message", get(handlers::get_health_message))
        .route("/api/calendar", get(handlers::get_calendar))
        .with_state(state)
}
