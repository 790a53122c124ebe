use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::ReportFilter;
use crate::services::ReportService;

#[axum::debug_handler]
pub async fn appointment_history_report(
    State(config): State<Arc<AppConfig>>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let rows = service.appointment_history(&filter).await?;
    Ok(Json(json!(rows)))
}

#[axum::debug_handler]
pub async fn doctor_activity_report(
    State(config): State<Arc<AppConfig>>,
    Query(filter): Query<ReportFilter>,
) -> Result<Json<Value>, AppError> {
    let service = ReportService::new(&config);
    let rows = service.doctor_activity(&filter).await?;
    Ok(Json(json!(rows)))
}
