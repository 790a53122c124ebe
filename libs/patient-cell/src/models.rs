use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    pub id_patient: i64,
    // Nested patients inside report rows only carry a subset of fields.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.lastname).trim().to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub name: String,
    pub lastname: String,
    pub dni: String,
    pub phone: String,
    pub address: String,
}

impl CreatePatientRequest {
    /// Trim every field and reject the request if any of them ends up empty.
    pub fn normalized(self) -> Result<Self, PatientError> {
        let normalized = Self {
            name: self.name.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            dni: self.dni.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        };

        for (field, value) in [
            ("name", &normalized.name),
            ("lastname", &normalized.lastname),
            ("dni", &normalized.dni),
            ("phone", &normalized.phone),
            ("address", &normalized.address),
        ] {
            if value.is_empty() {
                return Err(PatientError::MissingField(field.to_string()));
            }
        }

        Ok(normalized)
    }
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dni: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl UpdatePatientRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.lastname.is_none()
            && self.dni.is_none()
            && self.phone.is_none()
            && self.address.is_none()
    }

    /// Trim provided fields; a field sent as blank counts as an error rather than a clear.
    pub fn normalized(self) -> Result<Self, PatientError> {
        fn trim(field: &str, value: Option<String>) -> Result<Option<String>, PatientError> {
            match value {
                Some(v) if v.trim().is_empty() => Err(PatientError::MissingField(field.to_string())),
                Some(v) => Ok(Some(v.trim().to_string())),
                None => Ok(None),
            }
        }

        Ok(Self {
            name: trim("name", self.name)?,
            lastname: trim("lastname", self.lastname)?,
            dni: trim("dni", self.dni)?,
            phone: trim("phone", self.phone)?,
            address: trim("address", self.address)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatientError {
    #[error("Patient field '{0}' is required")]
    MissingField(String),

    #[error("Nothing to update")]
    EmptyUpdate,
}
