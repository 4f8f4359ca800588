use crate::{ScanId, ScanParams, Seq};

/// Requested side effects; the front-end's effect runner executes them
/// against the backend API and feeds the outcomes back as messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitScan { seq: Seq, params: ScanParams },
    FetchStatus { seq: Seq, scan_id: ScanId },
    FetchLog { seq: Seq, scan_id: ScanId },
    /// One-shot status + log fetch for a historical job.
    LoadHistorical { seq: Seq, scan_id: ScanId },
    FetchJobList,
    DeleteScan { scan_id: ScanId },
}
