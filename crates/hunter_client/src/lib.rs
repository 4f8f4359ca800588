//! Hunter client: HTTP access to the MarketHunter scan backend.
mod api;
mod handle;
mod screenshot;
mod types;

pub use api::{ApiSettings, ReqwestScanApi, ScanApi};
pub use handle::{ApiCommand, ApiEvent, ApiHandle};
pub use screenshot::screenshot_url;
pub use types::{
    AiAnalysis, ApiError, DealRecord, DeleteResponse, JobRecord, LogResponse, ScanRequest,
    Schedule, SmtpSettings, StatsPayload, StatusResponse, SubmitResponse, TokenCounts,
    Verification,
};
