// libs/appointment-cell/src/services/slots.rs
use chrono::{Duration, NaiveTime};

pub const SLOT_MINUTES: i64 = 30;
pub const FIRST_SLOT: (u32, u32) = (8, 0);
pub const LAST_SLOT: (u32, u32) = (19, 30);

/// Every bookable half-hour slot, 08:00 through 19:30.
pub fn slot_grid() -> Vec<NaiveTime> {
    let (Some(first), Some(last)) = (
        NaiveTime::from_hms_opt(FIRST_SLOT.0, FIRST_SLOT.1, 0),
        NaiveTime::from_hms_opt(LAST_SLOT.0, LAST_SLOT.1, 0),
    ) else {
        return Vec::new();
    };

    let mut slots = Vec::new();
    let mut current = first;
    while current <= last {
        slots.push(current);
        current += Duration::minutes(SLOT_MINUTES);
    }
    slots
}

pub fn slot_labels() -> Vec<String> {
    slot_grid()
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect()
}

pub fn is_bookable_slot(time: NaiveTime) -> bool {
    slot_grid().contains(&time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_twenty_four_half_hour_slots() {
        let labels = slot_labels();
        assert_eq!(labels.len(), 24);
        assert_eq!(labels.first().map(String::as_str), Some("08:00"));
        assert_eq!(labels.last().map(String::as_str), Some("19:30"));
    }

    #[test]
    fn off_grid_times_are_not_bookable() {
        assert!(is_bookable_slot(NaiveTime::from_hms_opt(10, 30, 0).unwrap()));
        assert!(!is_bookable_slot(NaiveTime::from_hms_opt(10, 15, 0).unwrap()));
        assert!(!is_bookable_slot(NaiveTime::from_hms_opt(7, 30, 0).unwrap()));
        assert!(!is_bookable_slot(NaiveTime::from_hms_opt(20, 0, 0).unwrap()));
    }
}
