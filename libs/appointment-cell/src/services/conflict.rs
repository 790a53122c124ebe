// libs/appointment-cell/src/services/conflict.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::{debug, warn};

use doctor_cell::models::Doctor;

use crate::models::{ConflictCheckResponse, ExistingAppointment, SlotAvailability};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::slots;
use crate::services::timezone::{self, ClinicZone};

/// Double-booking checks against an already fetched snapshot. Comparison is
/// done on local wall-clock date and `HH:MM`, never on stored strings.
pub struct ConflictDetectionService {
    zone: ClinicZone,
    lifecycle: AppointmentLifecycleService,
}

impl ConflictDetectionService {
    pub fn new(zone: ClinicZone) -> Self {
        Self {
            zone,
            lifecycle: AppointmentLifecycleService::new(),
        }
    }

    pub fn zone(&self) -> ClinicZone {
        self.zone
    }

    /// Check for appointment conflicts for a doctor at a local date and time
    pub fn check_conflicts(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        time: NaiveTime,
        exclude_appointment_id: Option<i64>,
        existing_appointments: &[ExistingAppointment],
    ) -> ConflictCheckResponse {
        debug!("Checking conflicts for doctor {} on {} at {}",
               doctor_id, date, timezone::format_time(time));

        let time = timezone::truncate_to_minute(time);
        let conflicting_appointments: Vec<ExistingAppointment> = self
            .slot_holders(doctor_id, exclude_appointment_id, existing_appointments)
            .filter(|(_, (d, t))| *d == date && *t == time)
            .map(|(appointment, _)| appointment.clone())
            .collect();

        let has_conflict = !conflicting_appointments.is_empty();
        if has_conflict {
            warn!("Conflict detected for doctor {} - {} conflicting appointments",
                  doctor_id, conflicting_appointments.len());
        }

        ConflictCheckResponse {
            has_conflict,
            conflicting_appointments,
        }
    }

    /// Local times already taken for the doctor on `date`, sorted.
    pub fn occupied_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        exclude_appointment_id: Option<i64>,
        existing_appointments: &[ExistingAppointment],
    ) -> Vec<NaiveTime> {
        let mut occupied: Vec<NaiveTime> = self
            .slot_holders(doctor_id, exclude_appointment_id, existing_appointments)
            .filter(|(_, (d, _))| *d == date)
            .map(|(_, (_, t))| t)
            .collect();
        occupied.sort();
        occupied.dedup();
        occupied
    }

    /// Free grid slots for the doctor on `date`: not taken, not already in
    /// the past, and inside the doctor's working hours when those are known.
    pub fn available_slots(
        &self,
        doctor_id: i64,
        date: NaiveDate,
        doctor: Option<&Doctor>,
        existing_appointments: &[ExistingAppointment],
        now: DateTime<Utc>,
    ) -> SlotAvailability {
        let occupied = self.occupied_slots(doctor_id, date, None, existing_appointments);

        let free_slots = slots::slot_grid()
            .into_iter()
            .filter(|slot| !occupied.contains(slot))
            .filter(|slot| doctor.map_or(true, |d| d.works_at(*slot)))
            .filter(|slot| {
                self.zone
                    .compose(date, *slot)
                    .is_some_and(|instant| instant >= now)
            })
            .map(timezone::format_time)
            .collect();

        SlotAvailability {
            doctor_id,
            date,
            free_slots,
            occupied_slots: occupied.into_iter().map(timezone::format_time).collect(),
        }
    }

    // ==============================================================================
    // PRIVATE HELPER METHODS
    // ==============================================================================

    /// Appointments of `doctor_id` that hold a slot, paired with their local date/time.
    fn slot_holders<'a>(
        &'a self,
        doctor_id: i64,
        exclude_appointment_id: Option<i64>,
        existing_appointments: &'a [ExistingAppointment],
    ) -> impl Iterator<Item = (&'a ExistingAppointment, (NaiveDate, NaiveTime))> + 'a {
        existing_appointments
            .iter()
            .filter(move |a| Some(a.id) != exclude_appointment_id)
            .filter(move |a| a.doctor_id == doctor_id)
            .filter(move |a| self.lifecycle.occupies_slot(a.state))
            .map(move |a| (a, self.zone.decompose(&a.date_time_utc)))
    }
}
