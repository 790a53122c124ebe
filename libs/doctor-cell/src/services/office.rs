use anyhow::Result;
use tracing::debug;

use shared_api_client::ClinicApiClient;
use shared_config::AppConfig;

use crate::models::MedicalOffice;

pub struct MedicalOfficeService {
    client: ClinicApiClient,
}

impl MedicalOfficeService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: ClinicApiClient::new(config),
        }
    }

    pub async fn list_offices(&self) -> Result<Vec<MedicalOffice>> {
        debug!("Fetching medical offices");
        let offices: Vec<MedicalOffice> = self.client.get("/medical-office").await?;
        Ok(offices)
    }

    pub async fn get_office(&self, number: i64) -> Result<MedicalOffice> {
        debug!("Fetching medical office: {}", number);
        let office: MedicalOffice = self.client.get(&format!("/medical-office/{}", number)).await?;
        Ok(office)
    }
}
