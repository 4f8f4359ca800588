//! Wire-to-core mapping for backend payloads.

use chrono::{DateTime, Utc};
use hunter_client::{DealRecord, JobRecord, StatsPayload, StatusResponse};
use hunter_core::{Deal, JobSummary, ScanSnapshot, ScanStage, ScanStats, ScanStatus};

pub fn parse_status(raw: &str) -> Option<ScanStatus> {
    match raw {
        "running" => Some(ScanStatus::Running),
        "complete" => Some(ScanStatus::Complete),
        "failed" => Some(ScanStatus::Failed),
        _ => None,
    }
}

fn parse_stage(raw: Option<&str>) -> ScanStage {
    match raw {
        Some("scraped") => ScanStage::Scraped,
        Some("analyzed") => ScanStage::Analyzed,
        Some("ranked") => ScanStage::Ranked,
        Some("complete") => ScanStage::Complete,
        // "initializing", absent, or anything unrecognized.
        _ => ScanStage::Initializing,
    }
}

fn parse_time(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|time| time.with_timezone(&Utc))
}

pub fn snapshot_from_response(response: StatusResponse) -> Option<ScanSnapshot> {
    let status = parse_status(&response.status)?;
    Some(ScanSnapshot {
        status,
        stage: parse_stage(response.stage.as_deref()),
        stats: response.stats.map(map_stats),
        results: response
            .results
            .map(|deals| deals.into_iter().map(map_deal).collect()),
        inventory: response
            .inventory
            .map(|deals| deals.into_iter().map(map_deal).collect()),
    })
}

fn map_stats(stats: StatsPayload) -> ScanStats {
    let tokens = stats.total_tokens.unwrap_or_default();
    ScanStats {
        total_duration_seconds: stats.total_duration_seconds.unwrap_or(0.0),
        total_cost_usd: stats.total_cost_usd.unwrap_or(0.0),
        tokens_in: tokens.input,
        tokens_out: tokens.output,
        start_time: parse_time(stats.start_time.as_deref()),
        output_dir: stats.output_dir,
    }
}

fn map_deal(record: DealRecord) -> Deal {
    Deal {
        id: record.id,
        title: record.title,
        price: record.price,
        url: record.url,
        location: record.location,
        reason: record.reason.or(record.flipper_comment),
        screenshot: record.screenshot,
        deal_rating: record.deal_rating,
    }
}

pub fn summary_from_record(record: JobRecord) -> JobSummary {
    let end_time = parse_time(record.end_time.as_deref());
    let status = parse_status(&record.status).unwrap_or_else(|| {
        // The job list derives status from end_time server-side; mirror
        // that when the field is missing or unrecognized.
        if end_time.is_some() {
            ScanStatus::Complete
        } else {
            ScanStatus::Running
        }
    });
    JobSummary {
        scan_id: record.scan_id,
        start_time: parse_time(record.start_time.as_deref()),
        end_time,
        status,
        query: record.query,
        location: record.location,
        source: record.source,
    }
}
