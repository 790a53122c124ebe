// libs/appointment-cell/src/models.rs
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use std::fmt;

use doctor_cell::models::{Doctor, MedicalOffice};
use patient_cell::models::Patient;
use shared_models::error::{ApiError, AppError};

use crate::services::timezone;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// Wire values are the backend's; the English names are accepted as aliases.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum AppointmentState {
    #[default]
    #[serde(rename = "RESERVADO", alias = "RESERVED")]
    Reserved,
    #[serde(rename = "ATENDIDO", alias = "ATTENDED")]
    Attended,
    #[serde(rename = "CANCELADO", alias = "CANCELED", alias = "CANCELLED")]
    Canceled,
}

impl fmt::Display for AppointmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentState::Reserved => write!(f, "RESERVADO"),
            AppointmentState::Attended => write!(f, "ATENDIDO"),
            AppointmentState::Canceled => write!(f, "CANCELADO"),
        }
    }
}

/// Appointment record as the backend returns it.
///
/// `date` normally holds the full UTC instant; `hour` repeats the local
/// wall-clock time the booking was made for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id_appointment: i64,
    pub date: String,
    #[serde(default)]
    pub hour: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AppointmentState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Patient>,
    #[serde(rename = "patientIdPatient", default, skip_serializing_if = "Option::is_none")]
    pub patient_id_patient: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<Doctor>,
    #[serde(rename = "doctorIdDoctor", default, skip_serializing_if = "Option::is_none")]
    pub doctor_id_doctor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_office: Option<MedicalOffice>,
    #[serde(rename = "medicalOfficeNumberOffice", default, skip_serializing_if = "Option::is_none")]
    pub medical_office_number_office: Option<i64>,
}

impl Appointment {
    pub fn patient_id(&self) -> Option<i64> {
        self.patient.as_ref().map(|p| p.id_patient).or(self.patient_id_patient)
    }

    pub fn doctor_id(&self) -> Option<i64> {
        self.doctor.as_ref().map(|d| d.id_doctor).or(self.doctor_id_doctor)
    }

    pub fn office_number(&self) -> Option<i64> {
        self.medical_office
            .as_ref()
            .map(|o| o.number_office)
            .or(self.medical_office_number_office)
    }

    pub fn state_or_default(&self) -> AppointmentState {
        self.state.unwrap_or_default()
    }

    /// The absolute instant this record was booked for.
    pub fn instant(&self) -> Result<DateTime<Utc>, AppointmentError> {
        timezone::parse_stored_instant(&self.date, &self.hour).ok_or_else(|| {
            AppointmentError::InvalidRecord(format!(
                "appointment {} has an unreadable date '{}'",
                self.id_appointment, self.date
            ))
        })
    }
}

// ==============================================================================
// BOOKING FORM MODELS
// ==============================================================================

/// Raw booking form input, before any validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCandidate {
    #[serde(default)]
    pub date_local: String,
    #[serde(default)]
    pub time_local: String,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub office_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<AppointmentState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editing_appointment_id: Option<i64>,
}

impl AppointmentCandidate {
    pub fn is_edit(&self) -> bool {
        self.editing_appointment_id.is_some()
    }
}

/// One entry of the snapshot the conflict check runs against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExistingAppointment {
    pub id: i64,
    pub doctor_id: i64,
    pub date_time_utc: DateTime<Utc>,
    #[serde(default)]
    pub state: AppointmentState,
}

impl TryFrom<&Appointment> for ExistingAppointment {
    type Error = AppointmentError;

    fn try_from(record: &Appointment) -> Result<Self, Self::Error> {
        let doctor_id = record.doctor_id().ok_or_else(|| {
            AppointmentError::InvalidRecord(format!(
                "appointment {} has no doctor",
                record.id_appointment
            ))
        })?;

        Ok(Self {
            id: record.id_appointment,
            doctor_id,
            date_time_utc: record.instant()?,
            state: record.state_or_default(),
        })
    }
}

/// A candidate that passed every rule, with its instant already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAppointment {
    pub instant: DateTime<Utc>,
    pub date_local: NaiveDate,
    pub time_local: NaiveTime,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub office_id: i64,
    pub observations: Option<String>,
    pub state: Option<AppointmentState>,
    pub editing_appointment_id: Option<i64>,
}

impl ValidatedAppointment {
    pub fn to_create_payload(&self) -> CreateAppointmentPayload {
        CreateAppointmentPayload {
            date: timezone::to_wire_instant(&self.instant),
            hour: timezone::format_time(self.time_local),
            observations: self.observations.clone(),
            patient_id_patient: self.patient_id,
            doctor_id_doctor: self.doctor_id,
            medical_office_number_office: self.office_id,
        }
    }

    pub fn to_update_payload(&self) -> UpdateAppointmentPayload {
        UpdateAppointmentPayload {
            date: timezone::to_wire_instant(&self.instant),
            hour: timezone::format_time(self.time_local),
            observations: self.observations.clone(),
            state: self.state,
            patient_id_patient: self.patient_id,
            doctor_id_doctor: self.doctor_id,
            medical_office_number_office: self.office_id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            medical_office_number: self.office_id,
        }
    }
}

// ==============================================================================
// BACKEND PAYLOADS
// ==============================================================================

/// Body of `POST /appointments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentPayload {
    pub date: String,
    pub hour: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    pub patient_id_patient: i64,
    pub doctor_id_doctor: i64,
    pub medical_office_number_office: i64,
}

/// Body of `PUT /appointments/{id}`. The update DTO reads `patientId`,
/// `doctorId` and `medicalOfficeNumber`; the create-style names ride along.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentPayload {
    pub date: String,
    pub hour: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<AppointmentState>,
    pub patient_id_patient: i64,
    pub doctor_id_doctor: i64,
    pub medical_office_number_office: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub medical_office_number: i64,
}

// ==============================================================================
// CONFLICT DETECTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
    pub conflicting_appointments: Vec<ExistingAppointment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SlotAvailability {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub free_slots: Vec<String>,
    pub occupied_slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingOutcome {
    pub appointment: Appointment,
    pub message: String,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

/// Recoverable rejections of a booking form, each with a message for the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, thiserror::Error)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BookingValidationError {
    #[error("Required field is missing or invalid: {field}")]
    MissingRequiredField { field: String },

    #[error("The appointment date and time cannot be in the past")]
    PastDateTime,

    #[error("Doctor {doctor_id} already has an appointment on {date} at {time}")]
    DuplicateSlot { doctor_id: i64, date: String, time: String },
}

impl BookingValidationError {
    pub fn missing(field: &str) -> Self {
        BookingValidationError::MissingRequiredField { field: field.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppointmentError {
    #[error(transparent)]
    Validation(#[from] BookingValidationError),

    #[error("Appointment {0} not found")]
    NotFound(i64),

    #[error("Invalid appointment record: {0}")]
    InvalidRecord(String),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

impl From<AppointmentError> for AppError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::Validation(e @ BookingValidationError::DuplicateSlot { .. }) => {
                AppError::Conflict(e.to_string())
            }
            AppointmentError::Validation(e) => AppError::ValidationError(e.to_string()),
            AppointmentError::NotFound(id) => AppError::NotFound(format!("Appointment {} not found", id)),
            AppointmentError::InvalidRecord(msg) => AppError::ExternalService(msg),
            AppointmentError::Api(api_error) => api_error.into(),
        }
    }
}
