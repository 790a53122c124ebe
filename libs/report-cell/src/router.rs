use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn report_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::appointment_history_report))
        .route("/doctors", get(handlers::doctor_activity_report))
        .with_state(state)
}
