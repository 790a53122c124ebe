use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::appointment_routes;
use doctor_cell::router::{doctor_routes, office_routes, specialty_routes};
use patient_cell::router::patient_routes;
use report_cell::router::report_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic administration API is running!" }))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/medical-specialties", specialty_routes(state.clone()))
        .nest("/medical-offices", office_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/reports", report_routes(state))
}
