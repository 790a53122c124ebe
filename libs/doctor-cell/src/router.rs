use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(state)
}

pub fn specialty_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_specialties))
        .route("/{specialty_id}", get(handlers::get_specialty))
        .with_state(state)
}

pub fn office_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_offices))
        .route("/{number}", get(handlers::get_office))
        .with_state(state)
}
