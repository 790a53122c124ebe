use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::PatientService;

fn map_patient_error(error: anyhow::Error) -> AppError {
    match error.downcast::<PatientError>() {
        Ok(patient_error) => AppError::ValidationError(patient_error.to_string()),
        Err(other) => AppError::from(other),
    }
}

#[axum::debug_handler]
pub async fn list_patients(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patients = service.list_patients()
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patients)))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.get_patient(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn create_patient(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = PatientService::new(&config);

    let patient = service.create_patient(request)
        .await
        .map_err(map_patient_error)?;

    Ok((StatusCode::CREATED, Json(json!({
        "patient": patient,
        "message": "Patient created successfully."
    }))))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let patient = service.update_patient(patient_id, request)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "patient": patient,
        "message": format!("Patient {} updated successfully.", patient_id)
    })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    service.delete_patient(patient_id)
        .await
        .map_err(map_patient_error)?;

    Ok(Json(json!({
        "message": format!("Patient {} deleted.", patient_id)
    })))
}
