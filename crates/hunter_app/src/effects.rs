//! Executes requested effects against the backend and feeds the
//! outcomes back into the message loop.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use hunter_client::{ApiCommand, ApiEvent, ApiHandle, ScanApi, ScanRequest};
use hunter_core::{Effect, Msg, ScanParams};
use hunter_logging::{hunter_debug, hunter_warn};

use crate::convert;

pub struct EffectRunner {
    handle: ApiHandle,
}

impl EffectRunner {
    /// Spawns the API thread plus a forwarding thread that translates
    /// raw API events into observer messages.
    pub fn new(api: Arc<dyn ScanApi>, msg_tx: Sender<Msg>) -> Self {
        let (handle, events) = ApiHandle::new(api);
        thread::spawn(move || {
            while let Ok(event) = events.recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            hunter_debug!("effect: {:?}", effect);
            self.handle.send(command_for(effect));
        }
    }
}

fn command_for(effect: Effect) -> ApiCommand {
    match effect {
        Effect::SubmitScan { seq, params } => ApiCommand::Submit {
            tag: seq,
            request: request_from_params(params),
        },
        Effect::FetchStatus { seq, scan_id } => ApiCommand::FetchStatus { tag: seq, scan_id },
        Effect::FetchLog { seq, scan_id } => ApiCommand::FetchLog { tag: seq, scan_id },
        Effect::LoadHistorical { seq, scan_id } => ApiCommand::LoadHistorical { tag: seq, scan_id },
        Effect::FetchJobList => ApiCommand::ListJobs,
        Effect::DeleteScan { scan_id } => ApiCommand::DeleteScan { scan_id },
    }
}

fn request_from_params(params: ScanParams) -> ScanRequest {
    ScanRequest {
        query: params.query,
        location: params.location,
        radius: params.radius,
        min_listings: params.min_listings,
        user_intent: params.user_intent,
        ..ScanRequest::default()
    }
}

fn map_event(event: ApiEvent) -> Msg {
    match event {
        ApiEvent::SubmitFinished { tag, result } => match result {
            Ok(response) => match response.scan_id.filter(|id| !id.is_empty()) {
                Some(scan_id) => Msg::SubmitCompleted { seq: tag, scan_id },
                None => {
                    hunter_warn!("submit accepted but no scan id returned");
                    Msg::SubmitFailed {
                        seq: tag,
                        error: "backend returned no scan id".to_string(),
                    }
                }
            },
            Err(err) => {
                hunter_warn!("submit failed: {}", err);
                Msg::SubmitFailed {
                    seq: tag,
                    error: err.to_string(),
                }
            }
        },
        ApiEvent::StatusFinished {
            tag,
            scan_id,
            result,
        } => match result {
            Ok(response) => match convert::snapshot_from_response(response) {
                Some(snapshot) => Msg::StatusArrived {
                    scan_id,
                    seq: tag,
                    snapshot,
                },
                None => {
                    hunter_warn!("unrecognized status payload for {}", scan_id);
                    Msg::StatusFailed {
                        scan_id,
                        seq: tag,
                        error: "unrecognized status".to_string(),
                    }
                }
            },
            Err(err) => {
                hunter_warn!("status fetch for {} failed: {}", scan_id, err);
                Msg::StatusFailed {
                    scan_id,
                    seq: tag,
                    error: err.to_string(),
                }
            }
        },
        ApiEvent::LogFinished {
            tag,
            scan_id,
            result,
        } => match result {
            Ok(log) => Msg::LogArrived {
                scan_id,
                seq: tag,
                log,
            },
            Err(err) => {
                hunter_warn!("log fetch for {} failed: {}", scan_id, err);
                Msg::LogFailed {
                    scan_id,
                    seq: tag,
                    error: err.to_string(),
                }
            }
        },
        ApiEvent::HistoricalFinished {
            tag,
            scan_id,
            result,
        } => match result {
            Ok((status, log)) => match convert::snapshot_from_response(status) {
                Some(snapshot) => Msg::HistoricalLoaded {
                    scan_id,
                    seq: tag,
                    snapshot,
                    log,
                },
                None => Msg::HistoricalFailed {
                    scan_id,
                    seq: tag,
                    error: "unrecognized status".to_string(),
                },
            },
            Err(err) => {
                hunter_warn!("historical load for {} failed: {}", scan_id, err);
                Msg::HistoricalFailed {
                    scan_id,
                    seq: tag,
                    error: err.to_string(),
                }
            }
        },
        ApiEvent::JobsFinished { result } => match result {
            Ok(records) => Msg::JobsArrived {
                jobs: records.into_iter().map(convert::summary_from_record).collect(),
            },
            Err(err) => {
                hunter_warn!("job list fetch failed: {}", err);
                Msg::JobsFailed {
                    error: err.to_string(),
                }
            }
        },
        ApiEvent::DeleteFinished { scan_id, result } => match result {
            Ok(_) => Msg::DeleteCompleted { scan_id },
            Err(err) => {
                hunter_warn!("delete of {} failed: {}", scan_id, err);
                Msg::DeleteFailed {
                    scan_id,
                    error: err.to_string(),
                }
            }
        },
    }
}
