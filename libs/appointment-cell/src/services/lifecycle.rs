// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::AppointmentState;

/// Appointment lifecycle as far as the booking form is concerned:
/// `RESERVADO -> {ATENDIDO, CANCELADO}`. Transitions are advisory here; the
/// backend owns the policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Get all valid next states for a given current state
    pub fn get_valid_transitions(&self, current_state: AppointmentState) -> Vec<AppointmentState> {
        match current_state {
            AppointmentState::Reserved => vec![
                AppointmentState::Attended,
                AppointmentState::Canceled,
            ],
            // Terminal states
            AppointmentState::Attended => vec![],
            AppointmentState::Canceled => vec![],
        }
    }

    pub fn is_terminal(&self, state: AppointmentState) -> bool {
        self.get_valid_transitions(state).is_empty()
    }

    /// Whether an appointment in `state` holds its doctor's slot.
    pub fn occupies_slot(&self, state: AppointmentState) -> bool {
        state != AppointmentState::Canceled
    }

    /// A candidate reserves a slot unless it is a status update to a terminal state.
    pub fn reserves_slot(&self, candidate_state: Option<AppointmentState>) -> bool {
        matches!(candidate_state, None | Some(AppointmentState::Reserved))
    }

    /// Whether a candidate, once saved, would hold its slot. Absent state means RESERVADO.
    pub fn holds_slot(&self, candidate_state: Option<AppointmentState>) -> bool {
        self.occupies_slot(candidate_state.unwrap_or_default())
    }

    /// Log the transition; returns false when it leaves the expected path.
    pub fn review_transition(&self, current_state: AppointmentState, new_state: AppointmentState) -> bool {
        if current_state == new_state {
            return true;
        }

        if self.get_valid_transitions(current_state).contains(&new_state) {
            debug!("State transition {} -> {}", current_state, new_state);
            true
        } else {
            warn!("Unusual state transition {} -> {}, leaving it to the backend", current_state, new_state);
            false
        }
    }
}
