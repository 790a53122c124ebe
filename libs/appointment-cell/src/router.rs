// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::list_appointments).post(handlers::book_appointment))

        // Form helpers
        .route("/form", get(handlers::new_appointment_form))
        .route("/slots", get(handlers::get_slot_grid))
        .route("/availability", get(handlers::get_availability))
        .route("/validate", post(handlers::validate_appointment))

        .route(
            "/{appointment_id}",
            get(handlers::get_appointment)
                .put(handlers::update_appointment)
                .delete(handlers::delete_appointment),
        )
        .route("/{appointment_id}/form", get(handlers::edit_appointment_form))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .with_state(state)
}
