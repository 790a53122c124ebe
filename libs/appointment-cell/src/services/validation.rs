// libs/appointment-cell/src/services/validation.rs
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{
    AppointmentCandidate, BookingValidationError, ExistingAppointment, ValidatedAppointment,
};
use crate::services::conflict::ConflictDetectionService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::slots;
use crate::services::timezone::{self, ClinicZone};

/// Booking form validator. Rules short-circuit in order: ids, date/time
/// format, past instant, double booking. Synchronous; the caller owns the
/// snapshot and the clock.
pub struct BookingValidator {
    zone: ClinicZone,
    conflicts: ConflictDetectionService,
    lifecycle: AppointmentLifecycleService,
}

impl BookingValidator {
    pub fn new(zone: ClinicZone) -> Self {
        Self {
            zone,
            conflicts: ConflictDetectionService::new(zone),
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub fn zone(&self) -> ClinicZone {
        self.zone
    }

    pub fn validate(
        &self,
        candidate: &AppointmentCandidate,
        existing_appointments: &[ExistingAppointment],
        now: DateTime<Utc>,
    ) -> Result<ValidatedAppointment, BookingValidationError> {
        let result = self.run_rules(candidate, existing_appointments, now);
        if let Err(e) = &result {
            warn!("Booking candidate rejected: {}", e);
        }
        result
    }

    fn run_rules(
        &self,
        candidate: &AppointmentCandidate,
        existing_appointments: &[ExistingAppointment],
        now: DateTime<Utc>,
    ) -> Result<ValidatedAppointment, BookingValidationError> {
        let patient_id = required_id(candidate.patient_id, "patientId")?;
        let doctor_id = required_id(candidate.doctor_id, "doctorId")?;
        let office_id = required_id(candidate.office_id, "officeId")?;

        // State only applies to edits; a new booking always starts RESERVADO.
        let state = if candidate.is_edit() { candidate.state } else { None };
        let reserves = self.lifecycle.reserves_slot(state);

        let date_local = timezone::parse_local_date(&candidate.date_local)
            .ok_or_else(|| BookingValidationError::missing("dateLocal"))?;
        // Off-grid times already stored can still be closed out by a status update.
        let time_local = timezone::parse_local_time(&candidate.time_local)
            .filter(|t| !reserves || slots::is_bookable_slot(*t))
            .ok_or_else(|| BookingValidationError::missing("timeLocal"))?;

        // A wall-clock time skipped by a DST jump has no instant.
        let instant = self
            .zone
            .compose(date_local, time_local)
            .ok_or_else(|| BookingValidationError::missing("timeLocal"))?;

        if reserves && instant < now {
            return Err(BookingValidationError::PastDateTime);
        }

        if self.lifecycle.holds_slot(state) {
            let check = self.conflicts.check_conflicts(
                doctor_id,
                date_local,
                time_local,
                candidate.editing_appointment_id,
                existing_appointments,
            );
            if check.has_conflict {
                return Err(BookingValidationError::DuplicateSlot {
                    doctor_id,
                    date: timezone::format_date(date_local),
                    time: timezone::format_time(time_local),
                });
            }
        } else {
            debug!("Canceling update, skipping conflict rules");
        }

        Ok(ValidatedAppointment {
            instant,
            date_local,
            time_local,
            patient_id,
            doctor_id,
            office_id,
            observations: candidate
                .observations
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
            state,
            editing_appointment_id: candidate.editing_appointment_id,
        })
    }
}

fn required_id(value: Option<i64>, field: &str) -> Result<i64, BookingValidationError> {
    value
        .filter(|id| *id > 0)
        .ok_or_else(|| BookingValidationError::missing(field))
}
