use serde::{Deserialize, Serialize};
use chrono::NaiveTime;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id_doctor: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub enrollment: String,
    /// Start of the working day, `HH:MM` or `HH:MM:SS`.
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_specialty: Option<Vec<MedicalSpecialty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_office: Option<MedicalOffice>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname).trim().to_string()
    }

    /// Working window, when both ends parse. Doctors without one are treated as
    /// available for the whole slot grid.
    pub fn working_hours(&self) -> Option<(NaiveTime, NaiveTime)> {
        let start = parse_clock(&self.start_time)?;
        let end = parse_clock(&self.end_time)?;
        if start < end {
            Some((start, end))
        } else {
            None
        }
    }

    /// True when a slot starting at `time` begins inside the working window.
    pub fn works_at(&self, time: NaiveTime) -> bool {
        match self.working_hours() {
            Some((start, end)) => time >= start && time < end,
            None => true,
        }
    }
}

fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalSpecialty {
    pub id_specialty: i64,
    #[serde(default)]
    pub specialty_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalOffice {
    pub number_office: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<Box<Doctor>>,
}
