use chrono::{DateTime, Utc};

use crate::{JobSummary, ScanId, ScanParams, ScanSnapshot, Seq};

/// Inputs to the observer state machine.
///
/// Network responses carry the scan id and the sequence number of the
/// request that produced them; `update` discards anything stale.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted the new-mission form.
    SubmitRequested { params: ScanParams },
    /// Backend accepted the submission and assigned a scan id.
    SubmitCompleted { seq: Seq, scan_id: ScanId },
    /// Submission failed; no scan exists.
    SubmitFailed { seq: Seq, error: String },
    /// Fixed-interval poll tick.
    PollTick,
    /// Status response for an issued fetch.
    StatusArrived {
        scan_id: ScanId,
        seq: Seq,
        snapshot: ScanSnapshot,
    },
    /// Status fetch failed; previous snapshot stays as-is.
    StatusFailed {
        scan_id: ScanId,
        seq: Seq,
        error: String,
    },
    /// Log response; replaces the whole buffer.
    LogArrived {
        scan_id: ScanId,
        seq: Seq,
        log: String,
    },
    /// Log fetch failed; previous text stays as-is.
    LogFailed {
        scan_id: ScanId,
        seq: Seq,
        error: String,
    },
    /// User picked a job from the history list.
    JobSelected { scan_id: ScanId },
    /// One-shot status + log for a selected historical job.
    HistoricalLoaded {
        scan_id: ScanId,
        seq: Seq,
        snapshot: ScanSnapshot,
        log: String,
    },
    /// Historical load failed (typically the job no longer exists).
    HistoricalFailed {
        scan_id: ScanId,
        seq: Seq,
        error: String,
    },
    /// Refreshed job history list.
    JobsArrived { jobs: Vec<JobSummary> },
    /// Job list fetch failed; keep the previous list.
    JobsFailed { error: String },
    /// User asked to delete a job.
    DeleteRequested { scan_id: ScanId },
    /// Backend confirmed the deletion.
    DeleteCompleted { scan_id: ScanId },
    /// Deletion failed.
    DeleteFailed { scan_id: ScanId, error: String },
    /// User reset to the new-mission form.
    NewMissionRequested,
    /// Ask for a job list refresh (initial load).
    RefreshJobsRequested,
    /// Fast wall-clock tick driving the elapsed readout.
    ElapsedTick { now: DateTime<Utc> },
    /// Fallback for placeholder wiring.
    NoOp,
}
