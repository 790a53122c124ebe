// libs/report-cell/src/models.rs
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use appointment_cell::services::timezone;
use shared_models::error::{ApiError, AppError};

// ==============================================================================
// FILTERS
// ==============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    Week,
    Month,
    Year,
    Custom,
}

impl FilterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Week => "week",
            FilterType::Month => "month",
            FilterType::Year => "year",
            FilterType::Custom => "custom",
        }
    }
}

/// Report date range as picked on the report screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    #[serde(default)]
    pub filter_type: FilterType,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl ReportFilter {
    /// Query string for the backend report endpoints. A custom range is
    /// inclusive of its end date, so the backend receives the day after.
    pub fn to_query(&self) -> Result<String, ReportError> {
        let mut params = vec![("filterType", self.filter_type.as_str().to_string())];

        if self.filter_type == FilterType::Custom {
            let start = non_blank(&self.start_date).ok_or(ReportError::MissingDateRange)?;
            let end = non_blank(&self.end_date).ok_or(ReportError::MissingDateRange)?;

            let start_date = parse_range_date(start)?;
            let end_date = parse_range_date(end)?;
            if start_date > end_date {
                return Err(ReportError::InvertedRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }

            params.push(("startDate", timezone::format_date(start_date)));
            params.push(("endDate", timezone::format_date(end_date + Duration::days(1))));
        }

        Ok(params
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&"))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_range_date(raw: &str) -> Result<NaiveDate, ReportError> {
    timezone::parse_local_date(raw).ok_or_else(|| ReportError::InvalidDate(raw.to_string()))
}

// ==============================================================================
// BACKEND REPORT SHAPES
// ==============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonName {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
}

impl PersonName {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname).trim().to_string()
    }
}

/// Row of `GET /appointments/report`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentReportRecord {
    pub id_appointment: i64,
    pub date: String,
    #[serde(default)]
    pub hour: String,
    #[serde(default)]
    pub patient: Option<PersonName>,
    #[serde(default)]
    pub doctor: Option<PersonName>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientRef {
    pub id_patient: i64,
}

/// Appointment nested in a doctor report entry; only the patient id comes back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorReportAppointment {
    pub id_appointment: i64,
    pub date: String,
    #[serde(default)]
    pub hour: String,
    #[serde(default)]
    pub patient: Option<PatientRef>,
    #[serde(rename = "patientIdPatient", default)]
    pub patient_id_patient: Option<i64>,
}

impl DoctorReportAppointment {
    pub fn patient_id(&self) -> Option<i64> {
        self.patient
            .as_ref()
            .map(|p| p.id_patient)
            .or(self.patient_id_patient)
            .filter(|id| *id > 0)
    }
}

/// Entry of `GET /doctors/report`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorReportRecord {
    pub id_doctor: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub appointments: Option<Vec<DoctorReportAppointment>>,
}

// ==============================================================================
// REPORT ROWS
// ==============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentHistoryRow {
    pub id: i64,
    pub date: String,
    pub hour: String,
    pub patient: String,
    pub doctor: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorActivityAppointment {
    pub id: i64,
    pub date: String,
    pub hour: String,
    pub patient: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorActivityRow {
    pub doctor_id: i64,
    pub doctor: String,
    pub appointment_count: usize,
    pub appointments: Vec<DoctorActivityAppointment>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("A custom report needs both a start date and an end date")]
    MissingDateRange,

    #[error("Invalid report date: {0}")]
    InvalidDate(String),

    #[error("The start date {start} is after the end date {end}")]
    InvertedRange { start: String, end: String },

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),
}

impl From<ReportError> for AppError {
    fn from(error: ReportError) -> Self {
        match error {
            ReportError::Api(api_error) => api_error.into(),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
