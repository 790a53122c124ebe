use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::{extract_server_message, ApiError};

/// Thin JSON client for the clinic REST backend.
#[derive(Clone)]
pub struct ClinicApiClient {
    client: Client,
    base_url: String,
}

impl ClinicApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.clinic_api_url.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut req = self.client.request(method.clone(), &url)
            .headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(body_data);
        }

        let response = req.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, url, e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}) on {} {}: {}", status, method, url, error_text);

            return Err(ApiError::Status {
                status: status.as_u16(),
                message: extract_server_message(&error_text),
            });
        }

        debug!("{} {} -> {}", method, url, status);
        Ok(response)
    }

    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// For calls whose success response carries no useful body (DELETE).
    pub async fn request_no_content(&self, method: Method, path: &str) -> Result<(), ApiError> {
        self.send::<()>(method, path, None).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_no_content(Method::DELETE, path).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
