use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::types::{JobsResponse, SchedulesResponse};
use crate::{
    ApiError, DeleteResponse, JobRecord, LogResponse, ScanRequest, Schedule, SmtpSettings,
    StatusResponse, SubmitResponse,
};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Backend API surface, one method per endpoint.
#[async_trait::async_trait]
pub trait ScanApi: Send + Sync {
    async fn submit_scan(&self, request: &ScanRequest) -> Result<SubmitResponse, ApiError>;
    async fn scan_status(&self, scan_id: &str) -> Result<StatusResponse, ApiError>;
    async fn scan_log(&self, scan_id: &str) -> Result<String, ApiError>;
    async fn delete_scan(&self, scan_id: &str) -> Result<DeleteResponse, ApiError>;
    async fn list_jobs(&self) -> Result<Vec<JobRecord>, ApiError>;
    async fn list_schedules(&self) -> Result<Vec<Schedule>, ApiError>;
    async fn save_schedule(&self, schedule: &Schedule) -> Result<(), ApiError>;
    async fn delete_schedule(&self, id: &str) -> Result<(), ApiError>;
    async fn run_schedule(&self, id: &str) -> Result<(), ApiError>;
    async fn smtp_settings(&self) -> Result<SmtpSettings, ApiError>;
    async fn save_smtp_settings(&self, settings: &SmtpSettings) -> Result<(), ApiError>;
    async fn health(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestScanApi {
    client: reqwest::Client,
    base: Url,
}

impl ReqwestScanApi {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl("base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }
}

#[async_trait::async_trait]
impl ScanApi for ReqwestScanApi {
    async fn submit_scan(&self, request: &ScanRequest) -> Result<SubmitResponse, ApiError> {
        self.post_json(&["scan"], request).await
    }

    async fn scan_status(&self, scan_id: &str) -> Result<StatusResponse, ApiError> {
        let status: StatusResponse = self.get_json(&["scan", scan_id]).await?;
        // The backend answers 200 for unknown ids and flags them in-band.
        if status.status == "not_found" {
            return Err(ApiError::NotFound);
        }
        Ok(status)
    }

    async fn scan_log(&self, scan_id: &str) -> Result<String, ApiError> {
        let response: LogResponse = self.get_json(&["scan", scan_id, "log"]).await?;
        Ok(response.log)
    }

    async fn delete_scan(&self, scan_id: &str) -> Result<DeleteResponse, ApiError> {
        let url = self.endpoint(&["scan", scan_id])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode(response).await
    }

    async fn list_jobs(&self) -> Result<Vec<JobRecord>, ApiError> {
        let response: JobsResponse = self.get_json(&["jobs"]).await?;
        Ok(response.jobs)
    }

    async fn list_schedules(&self) -> Result<Vec<Schedule>, ApiError> {
        let response: SchedulesResponse = self.get_json(&["schedules"]).await?;
        Ok(response.schedules)
    }

    async fn save_schedule(&self, schedule: &Schedule) -> Result<(), ApiError> {
        let _: serde::de::IgnoredAny = self.post_json(&["schedules"], schedule).await?;
        Ok(())
    }

    async fn delete_schedule(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["schedules", id])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let _: serde::de::IgnoredAny = decode(response).await?;
        Ok(())
    }

    async fn run_schedule(&self, id: &str) -> Result<(), ApiError> {
        let _: serde::de::IgnoredAny = self
            .post_json(&["schedules", id, "run"], &empty_body())
            .await?;
        Ok(())
    }

    async fn smtp_settings(&self) -> Result<SmtpSettings, ApiError> {
        self.get_json(&["settings"]).await
    }

    async fn save_smtp_settings(&self, settings: &SmtpSettings) -> Result<(), ApiError> {
        let _: serde::de::IgnoredAny = self.post_json(&["settings"], settings).await?;
        Ok(())
    }

    async fn health(&self) -> Result<(), ApiError> {
        let _: serde::de::IgnoredAny = self.get_json(&["health"]).await?;
        Ok(())
    }
}

fn empty_body() -> std::collections::BTreeMap<String, String> {
    std::collections::BTreeMap::new()
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    if !status.is_success() {
        return Err(ApiError::HttpStatus(status.as_u16()));
    }
    response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::Timeout;
    }
    ApiError::Network(err.to_string())
}
