use chrono::{DateTime, Utc};

use crate::{Deal, JobSummary, ObserverPhase, ScanId, ScanStatus};

/// Everything the front-end needs to render one frame. Derived by
/// [`crate::ObserverState::view`], never stored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub phase: ObserverPhase,
    pub scan_id: Option<ScanId>,
    pub status_label: &'static str,
    pub stage_label: &'static str,
    /// Wall-clock elapsed while running; frozen to the server-reported
    /// total once terminal.
    pub elapsed_seconds: f64,
    pub cost_usd: f64,
    pub total_tokens: u64,
    pub output_dir: Option<String>,
    pub deals: Vec<Deal>,
    pub inventory: Vec<Deal>,
    pub log: String,
    pub jobs: Vec<JobRowView>,
    pub last_error: Option<String>,
    /// Terminal and the final log fetch has resolved; a one-shot run may
    /// exit once this is true.
    pub settled: bool,
}

/// One row in the job history list.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub scan_id: ScanId,
    pub started: Option<DateTime<Utc>>,
    pub status: ScanStatus,
    pub query: String,
    pub location: String,
    pub source: String,
}

impl JobRowView {
    pub(crate) fn from_summary(summary: &JobSummary) -> Self {
        Self {
            scan_id: summary.scan_id.clone(),
            started: summary.start_time,
            status: summary.status,
            query: summary.query.clone().unwrap_or_else(|| "Unknown".into()),
            location: summary.location.clone().unwrap_or_else(|| "Unknown".into()),
            source: summary.source.clone().unwrap_or_else(|| "manual".into()),
        }
    }
}
