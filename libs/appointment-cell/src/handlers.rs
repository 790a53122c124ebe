// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::AppointmentCandidate;
use crate::services::booking::AppointmentBookingService;
use crate::services::slots;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub doctor_id: Option<i64>,
    pub date: Option<String>,
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let appointments = service.list_appointments().await?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let appointment = service.get_appointment(appointment_id).await?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(candidate): Json<AppointmentCandidate>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = AppointmentBookingService::new(&config);
    let outcome = service.book_appointment(candidate).await?;
    Ok((StatusCode::CREATED, Json(json!(outcome))))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
    Json(candidate): Json<AppointmentCandidate>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let outcome = service.update_appointment(appointment_id, candidate).await?;
    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let outcome = service.cancel_appointment(appointment_id).await?;
    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    service.delete_appointment(appointment_id).await?;
    Ok(Json(json!({
        "message": format!("Appointment {} deleted.", appointment_id)
    })))
}

// ==============================================================================
// FORM AND UTILITY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn new_appointment_form(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    Ok(Json(json!(service.new_form())))
}

#[axum::debug_handler]
pub async fn edit_appointment_form(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let candidate = service.edit_form(appointment_id).await?;
    Ok(Json(json!(candidate)))
}

pub async fn get_slot_grid() -> Json<Value> {
    Json(json!({ "slots": slots::slot_labels() }))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(config): State<Arc<AppConfig>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let availability = service
        .available_slots(query.doctor_id.unwrap_or_default(), query.date.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!(availability)))
}

/// Dry run: the payload that would be sent, or the first failing rule.
#[axum::debug_handler]
pub async fn validate_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(candidate): Json<AppointmentCandidate>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentBookingService::new(&config);
    let validated = service.validate_candidate(&candidate).await?;

    let payload = if candidate.is_edit() {
        json!(validated.to_update_payload())
    } else {
        json!(validated.to_create_payload())
    };

    Ok(Json(json!({
        "valid": true,
        "payload": payload
    })))
}
