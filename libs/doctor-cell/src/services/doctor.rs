use anyhow::Result;
use tracing::debug;

use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;

use crate::models::{Doctor, MedicalSpecialty};

pub struct DoctorService {
    client: ClinicApiClient,
}

impl DoctorService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    pub fn with_client(client: ClinicApiClient) -> Self {
        Self { client }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        debug!("Fetching doctor list");
        let doctors: Vec<Doctor> = self.client.get("/doctors").await?;
        Ok(doctors)
    }

    pub async fn get_doctor(&self, doctor_id: i64) -> Result<Doctor> {
        debug!("Fetching doctor: {}", doctor_id);
        let doctor: Doctor = self.client.get(&format!("/doctors/{}", doctor_id)).await?;
        Ok(doctor)
    }

    pub async fn list_specialties(&self) -> Result<Vec<MedicalSpecialty>> {
        debug!("Fetching medical specialties");
        let specialties: Vec<MedicalSpecialty> = self.client.get("/medical-specialty").await?;
        Ok(specialties)
    }

    pub async fn get_specialty(&self, specialty_id: i64) -> Result<MedicalSpecialty> {
        debug!("Fetching medical specialty: {}", specialty_id);
        let specialty: MedicalSpecialty = self.client
            .get(&format!("/medical-specialty/{}", specialty_id))
            .await?;
        Ok(specialty)
    }
}
