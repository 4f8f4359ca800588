use crate::{Effect, Msg, ObserverPhase, ObserverState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ObserverState, msg: Msg) -> (ObserverState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested { params } => {
            if params.query.trim().is_empty() {
                return (state, Vec::new());
            }
            match state.phase() {
                // A submission or historical load already in flight wins.
                ObserverPhase::Submitting | ObserverPhase::Loading => Vec::new(),
                _ => {
                    let seq = state.issue_seq();
                    state.begin_submit(seq);
                    vec![Effect::SubmitScan { seq, params }]
                }
            }
        }
        Msg::SubmitCompleted { seq, scan_id } => {
            if state.submit_succeeded(seq, scan_id.clone()) {
                // First fetch fires immediately, not on the next tick.
                let status_seq = state.issue_seq();
                let log_seq = state.issue_seq();
                vec![
                    Effect::FetchStatus {
                        seq: status_seq,
                        scan_id: scan_id.clone(),
                    },
                    Effect::FetchLog {
                        seq: log_seq,
                        scan_id,
                    },
                    Effect::FetchJobList,
                ]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitFailed { seq, error } => {
            state.submit_failed(seq, error);
            Vec::new()
        }
        Msg::PollTick => match (state.phase(), state.active_scan()) {
            (ObserverPhase::Running, Some(scan_id)) => {
                let scan_id = scan_id.to_owned();
                let status_seq = state.issue_seq();
                let log_seq = state.issue_seq();
                vec![
                    Effect::FetchStatus {
                        seq: status_seq,
                        scan_id: scan_id.clone(),
                    },
                    Effect::FetchLog {
                        seq: log_seq,
                        scan_id,
                    },
                ]
            }
            _ => Vec::new(),
        },
        Msg::StatusArrived {
            scan_id,
            seq,
            snapshot,
        } => {
            if state.apply_status(&scan_id, seq, snapshot) {
                // First time terminal: one final log fetch, then done.
                let log_seq = state.issue_seq();
                state.set_final_log_pending(log_seq);
                vec![
                    Effect::FetchLog {
                        seq: log_seq,
                        scan_id,
                    },
                    Effect::FetchJobList,
                ]
            } else {
                Vec::new()
            }
        }
        // Transient; the next tick retries at the normal interval.
        Msg::StatusFailed { .. } => Vec::new(),
        Msg::LogArrived { scan_id, seq, log } => {
            state.apply_log(&scan_id, seq, log);
            Vec::new()
        }
        Msg::LogFailed { scan_id, seq, .. } => {
            state.log_fetch_failed(&scan_id, seq);
            Vec::new()
        }
        Msg::JobSelected { scan_id } => {
            if scan_id.is_empty() {
                return (state, Vec::new());
            }
            let seq = state.issue_seq();
            state.begin_load(seq, scan_id.clone());
            vec![Effect::LoadHistorical { seq, scan_id }]
        }
        Msg::HistoricalLoaded {
            scan_id,
            seq,
            snapshot,
            log,
        } => {
            state.apply_historical(&scan_id, seq, snapshot, log);
            Vec::new()
        }
        Msg::HistoricalFailed { scan_id, seq, error } => {
            state.historical_failed(&scan_id, seq, error);
            Vec::new()
        }
        Msg::JobsArrived { jobs } => {
            state.set_jobs(jobs);
            Vec::new()
        }
        Msg::JobsFailed { .. } => Vec::new(),
        Msg::DeleteRequested { scan_id } => {
            if scan_id.is_empty() {
                return (state, Vec::new());
            }
            state.delete_requested(&scan_id);
            vec![Effect::DeleteScan { scan_id }]
        }
        Msg::DeleteCompleted { .. } => vec![Effect::FetchJobList],
        Msg::DeleteFailed { scan_id, error } => {
            state.set_error(format!("delete {scan_id}: {error}"));
            Vec::new()
        }
        Msg::NewMissionRequested => {
            state.reset_to_idle();
            Vec::new()
        }
        Msg::RefreshJobsRequested => vec![Effect::FetchJobList],
        Msg::ElapsedTick { now } => {
            state.set_now(now);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
