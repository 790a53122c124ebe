use std::sync::Arc;
use chrono::FixedOffset;
use serde_json::{json, Value};

use shared_config::AppConfig;

/// UTC-3, the clinic's zone in most fixtures.
pub fn clinic_offset() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

pub struct TestConfig {
    pub clinic_api_url: String,
    pub clinic_utc_offset: Option<FixedOffset>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            clinic_api_url: "http://localhost:3000".to_string(),
            clinic_utc_offset: Some(clinic_offset()),
        }
    }
}

impl TestConfig {
    /// Point the config at a mock backend (usually `MockServer::uri()`).
    pub fn for_backend(uri: impl Into<String>) -> Self {
        Self {
            clinic_api_url: uri.into(),
            ..Default::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig::with_api_url(self.clinic_api_url.clone(), self.clinic_utc_offset)
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct MockClinicResponses;

impl MockClinicResponses {
    pub fn patient_response(id: i64, name: &str, lastname: &str) -> Value {
        json!({
            "id_patient": id,
            "name": name,
            "lastname": lastname,
            "dni": format!("30{:06}", id),
            "phone": "3704-123456",
            "address": "Av. 25 de Mayo 100"
        })
    }

    pub fn doctor_response(id: i64, name: &str, lastname: &str) -> Value {
        json!({
            "id_doctor": id,
            "name": name,
            "lastname": lastname,
            "enrollment": format!("MP-{}", 1000 + id),
            "start_time": "08:00",
            "end_time": "20:00"
        })
    }

    pub fn office_response(number: i64) -> Value {
        json!({ "number_office": number })
    }

    /// Appointment as the backend stores it: `date` is the full UTC instant.
    pub fn appointment_response(id: i64, doctor_id: i64, date: &str, hour: &str, state: &str) -> Value {
        json!({
            "id_appointment": id,
            "date": date,
            "hour": hour,
            "observations": null,
            "state": state,
            "patient": { "id_patient": 1, "name": "Ana", "lastname": "García" },
            "doctor": { "id_doctor": doctor_id, "name": "Carlos", "lastname": "Ruiz" },
            "medical_office": { "number_office": 3 }
        })
    }

    pub fn error_response(status: u16, message: &str) -> Value {
        json!({
            "statusCode": status,
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::for_backend("http://127.0.0.1:4010/");
        let app_config = config.to_app_config();

        assert_eq!(app_config.clinic_api_url, "http://127.0.0.1:4010");
        assert_eq!(app_config.clinic_utc_offset, Some(clinic_offset()));
        assert!(app_config.is_configured());
    }

    #[test]
    fn test_appointment_fixture_shape() {
        let appointment = MockClinicResponses::appointment_response(4, 7, "2025-10-28T13:00:00.000Z", "10:00", "RESERVADO");
        assert_eq!(appointment["doctor"]["id_doctor"], 7);
        assert_eq!(appointment["state"], "RESERVADO");
    }
}
