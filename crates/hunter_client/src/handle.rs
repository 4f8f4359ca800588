use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use hunter_logging::hunter_error;

use crate::{ApiError, DeleteResponse, JobRecord, ScanApi, ScanRequest, StatusResponse,
    SubmitResponse};

/// Work items for the API thread. `tag` is the caller's request sequence
/// number; events echo it back unchanged so the caller can discard stale
/// responses.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    Submit { tag: u64, request: ScanRequest },
    FetchStatus { tag: u64, scan_id: String },
    FetchLog { tag: u64, scan_id: String },
    /// One-shot status + log for a historical job.
    LoadHistorical { tag: u64, scan_id: String },
    ListJobs,
    DeleteScan { scan_id: String },
}

#[derive(Debug)]
pub enum ApiEvent {
    SubmitFinished {
        tag: u64,
        result: Result<SubmitResponse, ApiError>,
    },
    StatusFinished {
        tag: u64,
        scan_id: String,
        result: Result<StatusResponse, ApiError>,
    },
    LogFinished {
        tag: u64,
        scan_id: String,
        result: Result<String, ApiError>,
    },
    HistoricalFinished {
        tag: u64,
        scan_id: String,
        result: Result<(StatusResponse, String), ApiError>,
    },
    JobsFinished {
        result: Result<Vec<JobRecord>, ApiError>,
    },
    DeleteFinished {
        scan_id: String,
        result: Result<DeleteResponse, ApiError>,
    },
}

/// Owns a dedicated thread running a tokio runtime. Each command is
/// spawned as an independent task, so a slow status fetch never delays a
/// log fetch; completion order is whatever the network gives back.
#[derive(Debug, Clone)]
pub struct ApiHandle {
    cmd_tx: mpsc::Sender<ApiCommand>,
}

impl ApiHandle {
    pub fn new(api: Arc<dyn ScanApi>) -> (Self, mpsc::Receiver<ApiEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>();
        let (event_tx, event_rx) = mpsc::channel::<ApiEvent>();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    hunter_error!("API runtime failed to start: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = run_command(api, command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn send(&self, command: ApiCommand) {
        // A closed channel means the API thread is gone; nothing to do.
        let _ = self.cmd_tx.send(command);
    }
}

async fn run_command(api: Arc<dyn ScanApi>, command: ApiCommand) -> ApiEvent {
    match command {
        ApiCommand::Submit { tag, request } => ApiEvent::SubmitFinished {
            tag,
            result: api.submit_scan(&request).await,
        },
        ApiCommand::FetchStatus { tag, scan_id } => {
            let result = api.scan_status(&scan_id).await;
            ApiEvent::StatusFinished {
                tag,
                scan_id,
                result,
            }
        }
        ApiCommand::FetchLog { tag, scan_id } => {
            let result = api.scan_log(&scan_id).await;
            ApiEvent::LogFinished {
                tag,
                scan_id,
                result,
            }
        }
        ApiCommand::LoadHistorical { tag, scan_id } => {
            let result = load_historical(api.as_ref(), &scan_id).await;
            ApiEvent::HistoricalFinished {
                tag,
                scan_id,
                result,
            }
        }
        ApiCommand::ListJobs => ApiEvent::JobsFinished {
            result: api.list_jobs().await,
        },
        ApiCommand::DeleteScan { scan_id } => {
            let result = api.delete_scan(&scan_id).await;
            ApiEvent::DeleteFinished { scan_id, result }
        }
    }
}

async fn load_historical(
    api: &dyn ScanApi,
    scan_id: &str,
) -> Result<(StatusResponse, String), ApiError> {
    let status = api.scan_status(scan_id).await?;
    let log = api.scan_log(scan_id).await?;
    Ok((status, log))
}
