// libs/appointment-cell/src/services/booking.rs
use chrono::Utc;
use tracing::{debug, info, warn};

use doctor_cell::services::DoctorService;
use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;
use shared_models::error::ApiError;

use crate::models::{
    Appointment, AppointmentCandidate, AppointmentError, AppointmentState, BookingOutcome,
    BookingValidationError, ExistingAppointment, SlotAvailability, ValidatedAppointment,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::timezone::{self, ClinicZone};
use crate::services::validation::BookingValidator;

pub const DEFAULT_FORM_TIME: &str = "09:00";

type Result<T> = std::result::Result<T, AppointmentError>;

pub struct AppointmentBookingService {
    client: ClinicApiClient,
    zone: ClinicZone,
    validator: BookingValidator,
    conflict_service: ConflictDetectionService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_client(ClinicApiClient::new(config), ClinicZone::from_config(config))
    }

    pub fn with_client(client: ClinicApiClient, zone: ClinicZone) -> Self {
        Self {
            client,
            zone,
            validator: BookingValidator::new(zone),
            conflict_service: ConflictDetectionService::new(zone),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    // ==============================================================================
    // READS
    // ==============================================================================

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>> {
        debug!("Fetching appointment list");
        let appointments: Vec<Appointment> = self.client.get("/appointments").await?;
        Ok(appointments)
    }

    pub async fn get_appointment(&self, appointment_id: i64) -> Result<Appointment> {
        debug!("Fetching appointment: {}", appointment_id);
        self.client
            .get(&format!("/appointments/{}", appointment_id))
            .await
            .map_err(|e| not_found_or(e, appointment_id))
    }

    /// Current appointments as conflict-check entries. Records that cannot be
    /// placed in time or attributed to a doctor are skipped.
    pub async fn existing_snapshot(&self) -> Result<Vec<ExistingAppointment>> {
        let records = self.list_appointments().await?;
        let total = records.len();

        let snapshot: Vec<ExistingAppointment> = records
            .iter()
            .filter_map(|record| match ExistingAppointment::try_from(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping appointment in snapshot: {}", e);
                    None
                }
            })
            .collect();

        debug!("Snapshot holds {} of {} appointments", snapshot.len(), total);
        Ok(snapshot)
    }

    // ==============================================================================
    // FORMS
    // ==============================================================================

    pub fn new_form(&self) -> AppointmentCandidate {
        AppointmentCandidate {
            time_local: DEFAULT_FORM_TIME.to_string(),
            ..Default::default()
        }
    }

    /// Pre-populate the form for an existing appointment, in local terms.
    pub async fn edit_form(&self, appointment_id: i64) -> Result<AppointmentCandidate> {
        let record = self.get_appointment(appointment_id).await?;
        let (date, time) = self.zone.decompose(&record.instant()?);

        Ok(AppointmentCandidate {
            date_local: timezone::format_date(date),
            time_local: timezone::format_time(time),
            patient_id: record.patient_id(),
            doctor_id: record.doctor_id(),
            office_id: record.office_number(),
            observations: record.observations.clone(),
            state: Some(record.state_or_default()),
            editing_appointment_id: Some(record.id_appointment),
        })
    }

    // ==============================================================================
    // VALIDATION AND WRITES
    // ==============================================================================

    /// Run every booking rule against a fresh snapshot without submitting.
    pub async fn validate_candidate(&self, candidate: &AppointmentCandidate) -> Result<ValidatedAppointment> {
        let snapshot = self.existing_snapshot().await?;
        let now = Utc::now();
        Ok(self.validator.validate(candidate, &snapshot, now)?)
    }

    pub async fn book_appointment(&self, mut candidate: AppointmentCandidate) -> Result<BookingOutcome> {
        // Creation always starts RESERVADO on the backend.
        candidate.state = None;
        candidate.editing_appointment_id = None;

        let validated = self.validate_candidate(&candidate).await?;
        let payload = validated.to_create_payload();
        debug!("Creating appointment for doctor {} at {}", payload.doctor_id_doctor, payload.date);

        let appointment: Appointment = self.client.post("/appointments", &payload).await?;
        info!("Appointment created with ID: {}", appointment.id_appointment);

        Ok(BookingOutcome {
            appointment,
            message: "Appointment created successfully.".to_string(),
        })
    }

    pub async fn update_appointment(
        &self,
        appointment_id: i64,
        mut candidate: AppointmentCandidate,
    ) -> Result<BookingOutcome> {
        candidate.editing_appointment_id = Some(appointment_id);

        let snapshot = self.existing_snapshot().await?;
        if let (Some(current), Some(next)) = (
            snapshot.iter().find(|a| a.id == appointment_id),
            candidate.state,
        ) {
            self.lifecycle_service.review_transition(current.state, next);
        }

        let now = Utc::now();
        let validated = self.validator.validate(&candidate, &snapshot, now)?;
        let payload = validated.to_update_payload();
        debug!("Updating appointment {} to {}", appointment_id, payload.date);

        let appointment: Appointment = self
            .client
            .put(&format!("/appointments/{}", appointment_id), &payload)
            .await
            .map_err(|e| not_found_or(e, appointment_id))?;
        info!("Appointment {} updated", appointment_id);

        Ok(BookingOutcome {
            appointment,
            message: format!("Appointment {} updated successfully.", appointment_id),
        })
    }

    /// Cancel by update. The record keeps its slot fields; only the state changes.
    pub async fn cancel_appointment(&self, appointment_id: i64) -> Result<BookingOutcome> {
        let record = self.get_appointment(appointment_id).await?;
        self.lifecycle_service
            .review_transition(record.state_or_default(), AppointmentState::Canceled);

        let instant = record.instant()?;
        let (date_local, time_local) = self.zone.decompose(&instant);
        let missing = |what: &str| {
            AppointmentError::InvalidRecord(format!("appointment {} has no {}", appointment_id, what))
        };

        let cancellation = ValidatedAppointment {
            instant,
            date_local,
            time_local,
            patient_id: record.patient_id().ok_or_else(|| missing("patient"))?,
            doctor_id: record.doctor_id().ok_or_else(|| missing("doctor"))?,
            office_id: record.office_number().ok_or_else(|| missing("office"))?,
            observations: record.observations.clone(),
            state: Some(AppointmentState::Canceled),
            editing_appointment_id: Some(appointment_id),
        };

        let appointment: Appointment = self
            .client
            .put(&format!("/appointments/{}", appointment_id), &cancellation.to_update_payload())
            .await
            .map_err(|e| not_found_or(e, appointment_id))?;
        info!("Appointment {} canceled", appointment_id);

        Ok(BookingOutcome {
            appointment,
            message: format!("Appointment {} canceled.", appointment_id),
        })
    }

    pub async fn delete_appointment(&self, appointment_id: i64) -> Result<()> {
        debug!("Deleting appointment: {}", appointment_id);
        self.client
            .delete(&format!("/appointments/{}", appointment_id))
            .await
            .map_err(|e| not_found_or(e, appointment_id))?;
        info!("Appointment {} deleted", appointment_id);
        Ok(())
    }

    // ==============================================================================
    // AVAILABILITY
    // ==============================================================================

    /// Free and taken slots for a doctor on a local date (`YYYY-MM-DD`).
    pub async fn available_slots(&self, doctor_id: i64, date_local: &str) -> Result<SlotAvailability> {
        if doctor_id <= 0 {
            return Err(BookingValidationError::missing("doctorId").into());
        }
        let date = timezone::parse_local_date(date_local)
            .ok_or_else(|| BookingValidationError::missing("date"))?;

        // Working hours narrow the grid when the doctor record has them.
        let doctor = match DoctorService::with_client(self.client.clone()).get_doctor(doctor_id).await {
            Ok(doctor) => Some(doctor),
            Err(e) => {
                warn!("Could not load doctor {} for working hours: {}", doctor_id, e);
                None
            }
        };

        let snapshot = self.existing_snapshot().await?;
        Ok(self
            .conflict_service
            .available_slots(doctor_id, date, doctor.as_ref(), &snapshot, Utc::now()))
    }
}

fn not_found_or(error: ApiError, appointment_id: i64) -> AppointmentError {
    if error.is_not_found() {
        AppointmentError::NotFound(appointment_id)
    } else {
        AppointmentError::Api(error)
    }
}
