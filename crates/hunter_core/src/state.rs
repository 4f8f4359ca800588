use chrono::{DateTime, Utc};

use crate::view_model::{DashboardView, JobRowView};

/// Opaque backend-assigned scan identifier.
pub type ScanId = String;

/// Monotonic sequence number tagging every request-producing effect.
///
/// Responses echo the tag back; a response is only applied when its tag is
/// newer than the last accepted one for the same channel, which makes
/// out-of-order and post-switch arrivals inert.
pub type Seq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    Running,
    Complete,
    Failed,
}

impl ScanStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanStatus::Complete | ScanStatus::Failed)
    }
}

/// Coarse progress marker within a running scan. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStage {
    Initializing,
    Scraped,
    Analyzed,
    Ranked,
    Complete,
}

impl ScanStage {
    pub fn label(self) -> &'static str {
        match self {
            ScanStage::Initializing => "Initializing",
            ScanStage::Scraped => "Scraping listings",
            ScanStage::Analyzed => "Analyzing images",
            ScanStage::Ranked => "Ranking deals",
            ScanStage::Complete => "Complete",
        }
    }
}

/// Lifecycle of the observation itself.
///
/// `Loading` covers the one-shot historical fetch; everything else follows
/// `Idle -> Submitting -> Running -> {Complete, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObserverPhase {
    #[default]
    Idle,
    Submitting,
    Loading,
    Running,
    Complete,
    Failed,
}

impl ObserverPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, ObserverPhase::Complete | ObserverPhase::Failed)
    }
}

/// Aggregate statistics reported by the backend for one scan.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanStats {
    pub total_duration_seconds: f64,
    pub total_cost_usd: f64,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub output_dir: Option<String>,
}

/// One listing as shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub price: String,
    pub url: String,
    pub location: Option<String>,
    pub reason: Option<String>,
    pub screenshot: Option<String>,
    pub deal_rating: Option<u8>,
}

/// The latest accepted status payload for the observed scan.
///
/// Replaced wholesale on every accepted response; a response without
/// results clears previously displayed results.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSnapshot {
    pub status: ScanStatus,
    pub stage: ScanStage,
    pub stats: Option<ScanStats>,
    pub results: Option<Vec<Deal>>,
    pub inventory: Option<Vec<Deal>>,
}

/// Summary record for the history sidebar; independent of the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSummary {
    pub scan_id: ScanId,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: ScanStatus,
    pub query: Option<String>,
    pub location: Option<String>,
    pub source: Option<String>,
}

/// Parameters for a new scan submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    pub query: String,
    pub location: String,
    pub radius: u32,
    pub min_listings: u32,
    pub user_intent: Option<String>,
}

/// Owned observer state; one instance per active view.
///
/// All mutation goes through [`crate::update`]. Time and network responses
/// enter as messages, so the state machine stays deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObserverState {
    phase: ObserverPhase,
    active: Option<ScanId>,
    snapshot: Option<ScanSnapshot>,
    log: String,
    jobs: Vec<JobSummary>,
    last_error: Option<String>,
    now: Option<DateTime<Utc>>,
    next_seq: Seq,
    // Highest accepted response tag per channel.
    status_seq: Seq,
    log_seq: Seq,
    pending_submit: Option<Seq>,
    pending_load: Option<Seq>,
    pending_final_log: Option<Seq>,
    dirty: bool,
}

impl ObserverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ObserverPhase {
        self.phase
    }

    pub fn active_scan(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Terminal and not waiting on the final log fetch.
    pub fn settled(&self) -> bool {
        self.phase.is_terminal() && self.pending_final_log.is_none()
    }

    /// Returns whether the view changed since the last call, and resets
    /// the flag. The front-end re-renders only when this is true.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn issue_seq(&mut self) -> Seq {
        self.next_seq += 1;
        self.next_seq
    }

    fn clear_mission(&mut self) {
        self.snapshot = None;
        self.log.clear();
        self.last_error = None;
        self.pending_submit = None;
        self.pending_load = None;
        self.pending_final_log = None;
    }

    pub(crate) fn begin_submit(&mut self, seq: Seq) {
        self.clear_mission();
        self.active = None;
        self.phase = ObserverPhase::Submitting;
        self.pending_submit = Some(seq);
        // Anything issued before this point is stale from now on.
        self.status_seq = seq;
        self.log_seq = seq;
        self.mark_dirty();
    }

    pub(crate) fn submit_succeeded(&mut self, seq: Seq, scan_id: ScanId) -> bool {
        if self.pending_submit != Some(seq) || scan_id.is_empty() {
            return false;
        }
        self.pending_submit = None;
        self.active = Some(scan_id);
        self.phase = ObserverPhase::Running;
        self.mark_dirty();
        true
    }

    pub(crate) fn submit_failed(&mut self, seq: Seq, error: String) -> bool {
        if self.pending_submit != Some(seq) {
            return false;
        }
        self.pending_submit = None;
        // No fabricated scan id: the failure is local to this submission.
        self.active = None;
        self.phase = ObserverPhase::Failed;
        self.last_error = Some(error);
        self.mark_dirty();
        true
    }

    pub(crate) fn begin_load(&mut self, seq: Seq, scan_id: ScanId) {
        self.clear_mission();
        self.active = Some(scan_id);
        self.phase = ObserverPhase::Loading;
        self.pending_load = Some(seq);
        self.status_seq = seq;
        self.log_seq = seq;
        self.mark_dirty();
    }

    fn accepts(&self, scan_id: &str, seq: Seq, floor: Seq) -> bool {
        self.active.as_deref() == Some(scan_id) && seq > floor
    }

    /// Applies a status response wholesale. Returns true when this response
    /// moved the observation into a terminal phase (the caller then issues
    /// the one final log fetch).
    pub(crate) fn apply_status(&mut self, scan_id: &str, seq: Seq, snapshot: ScanSnapshot) -> bool {
        if !self.accepts(scan_id, seq, self.status_seq) {
            return false;
        }
        if !matches!(
            self.phase,
            ObserverPhase::Running | ObserverPhase::Complete | ObserverPhase::Failed
        ) {
            return false;
        }
        self.status_seq = seq;
        let was_terminal = self.phase.is_terminal();
        self.phase = match snapshot.status {
            ScanStatus::Running => ObserverPhase::Running,
            ScanStatus::Complete => ObserverPhase::Complete,
            ScanStatus::Failed => ObserverPhase::Failed,
        };
        self.snapshot = Some(snapshot);
        self.mark_dirty();
        self.phase.is_terminal() && !was_terminal
    }

    pub(crate) fn apply_log(&mut self, scan_id: &str, seq: Seq, log: String) {
        if !self.accepts(scan_id, seq, self.log_seq) {
            return;
        }
        self.log_seq = seq;
        // Full replacement, never concatenation.
        self.log = log;
        if self.pending_final_log.is_some_and(|pending| seq >= pending) {
            self.pending_final_log = None;
        }
        self.mark_dirty();
    }

    /// A failed log fetch keeps the previous text; if it was the final
    /// fetch after a terminal status, the observation still settles.
    pub(crate) fn log_fetch_failed(&mut self, scan_id: &str, seq: Seq) {
        if self.active.as_deref() != Some(scan_id) {
            return;
        }
        if self.pending_final_log == Some(seq) {
            self.pending_final_log = None;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_final_log_pending(&mut self, seq: Seq) {
        self.pending_final_log = Some(seq);
    }

    pub(crate) fn apply_historical(
        &mut self,
        scan_id: &str,
        seq: Seq,
        snapshot: ScanSnapshot,
        log: String,
    ) -> bool {
        if self.pending_load != Some(seq) || self.active.as_deref() != Some(scan_id) {
            return false;
        }
        self.pending_load = None;
        self.status_seq = seq;
        self.log_seq = seq;
        self.phase = match snapshot.status {
            // Still running: the regular tick resumes polling from here.
            ScanStatus::Running => ObserverPhase::Running,
            ScanStatus::Complete => ObserverPhase::Complete,
            ScanStatus::Failed => ObserverPhase::Failed,
        };
        self.snapshot = Some(snapshot);
        self.log = log;
        self.mark_dirty();
        true
    }

    pub(crate) fn historical_failed(&mut self, scan_id: &str, seq: Seq, error: String) {
        if self.pending_load != Some(seq) || self.active.as_deref() != Some(scan_id) {
            return;
        }
        // Missing or unreadable job: empty error state, not a crash.
        self.reset_to_idle();
        self.last_error = Some(error);
    }

    pub(crate) fn set_jobs(&mut self, jobs: Vec<JobSummary>) {
        if self.jobs != jobs {
            self.jobs = jobs;
            self.mark_dirty();
        }
    }

    /// Returns true when the deleted scan was the one being observed, in
    /// which case the observer drops straight back to idle.
    pub(crate) fn delete_requested(&mut self, scan_id: &str) -> bool {
        if self.active.as_deref() == Some(scan_id) {
            self.reset_to_idle();
            true
        } else {
            false
        }
    }

    pub(crate) fn reset_to_idle(&mut self) {
        self.clear_mission();
        self.active = None;
        self.phase = ObserverPhase::Idle;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, error: String) {
        self.last_error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = Some(now);
        // Only the elapsed readout depends on the clock.
        if self.phase == ObserverPhase::Running {
            self.mark_dirty();
        }
    }

    pub fn view(&self) -> DashboardView {
        let snapshot = self.snapshot.as_ref();
        let stats = snapshot.and_then(|snap| snap.stats.as_ref());

        let elapsed_seconds = if self.phase.is_terminal() {
            // Frozen to the server-reported total; never advances again.
            stats.map(|s| s.total_duration_seconds).unwrap_or(0.0)
        } else if self.phase == ObserverPhase::Running {
            match (self.now, stats.and_then(|s| s.start_time)) {
                (Some(now), Some(start)) => {
                    ((now - start).num_milliseconds() as f64 / 1000.0).max(0.0)
                }
                _ => 0.0,
            }
        } else {
            0.0
        };

        DashboardView {
            phase: self.phase,
            scan_id: self.active.clone(),
            status_label: status_label(self.phase),
            stage_label: snapshot.map(|snap| snap.stage.label()).unwrap_or(""),
            elapsed_seconds,
            cost_usd: stats.map(|s| s.total_cost_usd).unwrap_or(0.0),
            total_tokens: stats.map(|s| s.tokens_in + s.tokens_out).unwrap_or(0),
            output_dir: stats.and_then(|s| s.output_dir.clone()),
            deals: snapshot
                .and_then(|snap| snap.results.clone())
                .unwrap_or_default(),
            inventory: snapshot
                .and_then(|snap| snap.inventory.clone())
                .unwrap_or_default(),
            log: self.log.clone(),
            jobs: self.jobs.iter().map(JobRowView::from_summary).collect(),
            last_error: self.last_error.clone(),
            settled: self.settled(),
        }
    }
}

fn status_label(phase: ObserverPhase) -> &'static str {
    match phase {
        ObserverPhase::Idle => "Idle",
        ObserverPhase::Submitting => "Submitting",
        ObserverPhase::Loading => "Loading",
        ObserverPhase::Running => "Mission Active",
        ObserverPhase::Complete => "Mission Complete",
        ObserverPhase::Failed => "Mission Failed",
    }
}
