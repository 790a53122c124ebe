use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::services::{DoctorService, MedicalOfficeService};

#[axum::debug_handler]
pub async fn list_doctors(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let doctors = DoctorService::new(&config).list_doctors().await?;
    Ok(Json(json!(doctors)))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let doctor = DoctorService::new(&config).get_doctor(doctor_id).await?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn list_specialties(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let specialties = DoctorService::new(&config).list_specialties().await?;
    Ok(Json(json!(specialties)))
}

#[axum::debug_handler]
pub async fn get_specialty(
    State(config): State<Arc<AppConfig>>,
    Path(specialty_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let specialty = DoctorService::new(&config).get_specialty(specialty_id).await?;
    Ok(Json(json!(specialty)))
}

#[axum::debug_handler]
pub async fn list_offices(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let offices = MedicalOfficeService::new(&config).list_offices().await?;
    Ok(Json(json!(offices)))
}

#[axum::debug_handler]
pub async fn get_office(
    State(config): State<Arc<AppConfig>>,
    Path(number): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let office = MedicalOfficeService::new(&config).get_office(number).await?;
    Ok(Json(json!(office)))
}
