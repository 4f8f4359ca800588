//! Plain-terminal rendering of the dashboard view.

use hunter_client::screenshot_url;
use hunter_core::{DashboardView, JobRowView, ObserverPhase, ScanStatus};

pub fn format_duration(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    if whole < 60 {
        format!("{whole}s")
    } else {
        format!("{}m {}s", whole / 60, whole % 60)
    }
}

/// One-line progress readout, reprinted whenever the view changes.
pub fn status_line(view: &DashboardView) -> String {
    let mut line = format!("[{}] {}", view.status_label, view.stage_label);
    if let Some(scan_id) = &view.scan_id {
        line.push_str(&format!("  scan {scan_id}"));
    }
    line.push_str(&format!(
        "  {}  ${:.2}  {} tokens",
        format_duration(view.elapsed_seconds),
        view.cost_usd,
        view.total_tokens
    ));
    if let Some(error) = &view.last_error {
        line.push_str(&format!("  ({error})"));
    }
    line
}

/// Full summary printed once a mission settles.
pub fn final_report(view: &DashboardView, api_base: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} after {}\n",
        view.status_label,
        format_duration(view.elapsed_seconds)
    ));
    if view.phase == ObserverPhase::Failed {
        if let Some(error) = &view.last_error {
            out.push_str(&format!("  {error}\n"));
        }
    }

    if !view.deals.is_empty() {
        out.push_str(&format!("\nDeals ({}):\n", view.deals.len()));
        for deal in &view.deals {
            out.push_str(&format!("  {} — {}", deal.price, deal.title));
            if let Some(rating) = deal.deal_rating {
                out.push_str(&format!("  [{rating}/10]"));
            }
            out.push('\n');
            if let Some(reason) = &deal.reason {
                out.push_str(&format!("    {reason}\n"));
            }
            if !deal.url.is_empty() {
                out.push_str(&format!("    {}\n", deal.url));
            }
            if let (Some(dir), Some(file)) = (&view.output_dir, &deal.screenshot) {
                if let Some(url) = screenshot_url(api_base, dir, file) {
                    out.push_str(&format!("    screenshot: {url}\n"));
                }
            }
        }
    }

    if !view.inventory.is_empty() {
        out.push_str(&format!(
            "\nOther listings scanned: {}\n",
            view.inventory.len()
        ));
    }
    out
}

pub fn jobs_table(jobs: &[JobRowView]) -> String {
    if jobs.is_empty() {
        return "No past scans.\n".to_string();
    }
    let mut out = String::new();
    for job in jobs {
        let status = match job.status {
            ScanStatus::Running => "running",
            ScanStatus::Complete => "complete",
            ScanStatus::Failed => "failed",
        };
        let started = job
            .started
            .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<14} {:<9} {:<17} {:<12} {}\n",
            job.scan_id, status, started, job.location, job.query
        ));
    }
    out
}

/// Prints only what the log buffer gained since the last call. The
/// buffer is replaced wholesale on every fetch, so a divergent prefix
/// means a different scan's log and triggers a full reprint.
#[derive(Default)]
pub struct LogTail {
    printed: String,
}

impl LogTail {
    pub fn advance(&mut self, log: &str) -> Option<String> {
        if log == self.printed {
            return None;
        }
        let fresh = if let Some(suffix) = log.strip_prefix(self.printed.as_str()) {
            suffix.to_string()
        } else {
            log.to_string()
        };
        self.printed = log.to_string();
        if fresh.is_empty() {
            None
        } else {
            Some(fresh)
        }
    }
}
