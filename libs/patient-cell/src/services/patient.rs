use anyhow::Result;
use tracing::{debug, info};

use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;

use crate::models::{CreatePatientRequest, Patient, PatientError, UpdatePatientRequest};

pub struct PatientService {
    client: ClinicApiClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    pub fn with_client(client: ClinicApiClient) -> Self {
        Self { client }
    }

    pub async fn list_patients(&self) -> Result<Vec<Patient>> {
        debug!("Fetching patient list");
        let patients: Vec<Patient> = self.client.get("/patients").await?;
        Ok(patients)
    }

    pub async fn get_patient(&self, patient_id: i64) -> Result<Patient> {
        debug!("Fetching patient: {}", patient_id);
        let patient: Patient = self.client.get(&format!("/patients/{}", patient_id)).await?;
        Ok(patient)
    }

    pub async fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient> {
        let request = request.normalized()?;
        debug!("Creating patient {} {}", request.name, request.lastname);

        let patient: Patient = self.client.post("/patients", &request).await?;
        info!("Patient created with ID: {}", patient.id_patient);
        Ok(patient)
    }

    pub async fn update_patient(&self, patient_id: i64, request: UpdatePatientRequest) -> Result<Patient> {
        let request = request.normalized()?;
        if request.is_empty() {
            return Err(PatientError::EmptyUpdate.into());
        }
        debug!("Updating patient: {}", patient_id);

        let patient: Patient = self.client.put(&format!("/patients/{}", patient_id), &request).await?;
        info!("Patient {} updated", patient_id);
        Ok(patient)
    }

    pub async fn delete_patient(&self, patient_id: i64) -> Result<()> {
        debug!("Deleting patient: {}", patient_id);
        self.client.delete(&format!("/patients/{}", patient_id)).await?;
        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}
