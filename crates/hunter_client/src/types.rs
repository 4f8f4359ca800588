use serde::{Deserialize, Serialize};

/// Client-side error taxonomy for backend calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// The scan id is unknown to the backend. The status route reports
    /// this as HTTP 200 with `status: "not_found"`; delete uses a 404.
    #[error("scan not found")]
    NotFound,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Body for `POST /scan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRequest {
    pub query: String,
    pub location: String,
    pub radius: u32,
    pub min_listings: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_intent: Option<String>,
    pub source: String,
}

impl Default for ScanRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            location: "erskineville".to_string(),
            radius: 10,
            min_listings: 30,
            user_intent: None,
            source: "manual".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub scan_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `GET /scan/{id}`. Every field except `status` may be absent
/// while the pipeline is still warming up.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub stats: Option<StatsPayload>,
    #[serde(default)]
    pub results: Option<Vec<DealRecord>>,
    #[serde(default)]
    pub inventory: Option<Vec<DealRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsPayload {
    #[serde(default)]
    pub total_duration_seconds: Option<f64>,
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
    #[serde(default)]
    pub total_tokens: Option<TokenCounts>,
    /// RFC 3339 on the wire; parsed by the consumer.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Backend-side path whose last segment names the screenshot folder.
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TokenCounts {
    #[serde(default)]
    pub input: u64,
    #[serde(default)]
    pub output: u64,
}

/// One listing as reported by the backend, in full fidelity. Scraper and
/// analysis steps fill fields in progressively, so everything is optional
/// apart from the identity fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DealRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub deal_rating: Option<u8>,
    #[serde(default)]
    pub flipper_comment: Option<String>,
    #[serde(default)]
    pub estimated_new_price: Option<f64>,
    #[serde(default)]
    pub visual_brand_model: Option<String>,
    #[serde(default)]
    pub visual_condition: Option<String>,
    #[serde(default)]
    pub visual_tier: Option<String>,
    #[serde(default)]
    pub ai_analysis: Option<AiAnalysis>,
    #[serde(default)]
    pub verification: Option<Verification>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub is_steal: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub resale_price_estimate: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Verification {
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogResponse {
    #[serde(default)]
    pub log: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub scan_id: Option<String>,
}

/// Summary entry from `GET /jobs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRecord {
    #[serde(default)]
    pub scan_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// A recurring scan definition; stored by the backend scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub radius: u32,
    #[serde(default)]
    pub min_listings: u32,
    #[serde(default)]
    pub user_intent: String,
    /// `daily` or `weekly`.
    #[serde(default)]
    pub frequency: String,
    /// Local time of day, `HH:MM`.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub email_to: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
}

/// SMTP configuration for scheduled-scan result emails.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmtpSettings {
    #[serde(default)]
    pub smtp_server: String,
    #[serde(default)]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_user: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default)]
    pub default_email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct JobsResponse {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SchedulesResponse {
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}
