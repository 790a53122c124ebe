// libs/report-cell/src/services/report.rs
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use appointment_cell::services::timezone::{self, ClinicZone};
use patient_cell::models::Patient;
use patient_cell::services::PatientService;
use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;

use crate::models::{
    AppointmentHistoryRow, AppointmentReportRecord, DoctorActivityAppointment, DoctorActivityRow,
    DoctorReportAppointment, DoctorReportRecord, ReportError, ReportFilter,
};

const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

pub struct ReportService {
    client: ClinicApiClient,
    zone: ClinicZone,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(ClinicApiClient::new(config), ClinicZone::from_config(config))
    }

    pub fn with_client(client: ClinicApiClient, zone: ClinicZone) -> Self {
        Self { client, zone }
    }

    /// Appointment history for the range, dates shown in the clinic zone.
    pub async fn appointment_history(&self, filter: &ReportFilter) -> Result<Vec<AppointmentHistoryRow>, ReportError> {
        let query = filter.to_query()?;
        debug!("Fetching appointment report: {}", query);

        let records: Vec<AppointmentReportRecord> = self
            .client
            .get(&format!("/appointments/report?{}", query))
            .await?;

        Ok(records.iter().map(|record| self.history_row(record)).collect())
    }

    /// Appointments per doctor for the range. Dates are shown as stored (UTC).
    pub async fn doctor_activity(&self, filter: &ReportFilter) -> Result<Vec<DoctorActivityRow>, ReportError> {
        let query = filter.to_query()?;
        debug!("Fetching doctor report: {}", query);

        let doctors: Vec<DoctorReportRecord> = self
            .client
            .get(&format!("/doctors/report?{}", query))
            .await?;
        let patients = self.patient_directory().await;

        Ok(doctors
            .into_iter()
            .map(|doctor| {
                let appointments: Vec<DoctorActivityAppointment> = doctor
                    .appointments
                    .unwrap_or_default()
                    .iter()
                    .map(|appointment| DoctorActivityAppointment {
                        id: appointment.id_appointment,
                        date: utc_display_date(appointment),
                        hour: appointment.hour.clone(),
                        patient: patient_label(appointment.patient_id(), &patients),
                    })
                    .collect();

                DoctorActivityRow {
                    doctor_id: doctor.id_doctor,
                    doctor: format!("Dr. {} {}", doctor.name, doctor.lastname).trim().to_string(),
                    appointment_count: appointments.len(),
                    appointments,
                }
            })
            .collect())
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    fn history_row(&self, record: &AppointmentReportRecord) -> AppointmentHistoryRow {
        let date = match timezone::parse_stored_instant(&record.date, &record.hour) {
            Some(instant) => {
                let (date, _) = self.zone.decompose(&instant);
                date.format(DISPLAY_DATE_FORMAT).to_string()
            }
            None => {
                warn!("Appointment {} has an unreadable date '{}'", record.id_appointment, record.date);
                record.date.clone()
            }
        };

        AppointmentHistoryRow {
            id: record.id_appointment,
            date,
            hour: record.hour.clone(),
            patient: record.patient.as_ref().map(|p| p.full_name()).unwrap_or_default(),
            doctor: record.doctor.as_ref().map(|d| d.full_name()).unwrap_or_default(),
        }
    }

    /// Patients by id. A failed fetch leaves the report with bare ids.
    async fn patient_directory(&self) -> HashMap<i64, Patient> {
        match PatientService::with_client(self.client.clone()).list_patients().await {
            Ok(patients) => patients.into_iter().map(|p| (p.id_patient, p)).collect(),
            Err(e) => {
                warn!("Could not load patients for the doctor report: {}", e);
                HashMap::new()
            }
        }
    }
}

fn utc_display_date(appointment: &DoctorReportAppointment) -> String {
    match timezone::parse_stored_instant(&appointment.date, &appointment.hour) {
        Some(instant) => format_utc(&instant),
        None => appointment.date.clone(),
    }
}

fn format_utc(instant: &DateTime<Utc>) -> String {
    instant.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn patient_label(patient_id: Option<i64>, patients: &HashMap<i64, Patient>) -> String {
    match patient_id {
        None => "N/A".to_string(),
        Some(id) => match patients.get(&id) {
            Some(patient) => format!("{} {} (ID: {})", patient.name, patient.lastname, id),
            None => format!("ID Paciente: {}", id),
        },
    }
}
