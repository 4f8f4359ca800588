//! Top-level message loop wiring the observer core to the backend API.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use hunter_client::{ReqwestScanApi, ScanApi};
use hunter_core::{update, Msg, ObserverPhase, ObserverState, ScanParams};
use hunter_logging::hunter_info;

use crate::config::{AppConfig, Command};
use crate::effects::EffectRunner;
use crate::render::{self, LogTail};

pub fn run(command: Command, config: AppConfig) -> i32 {
    let api = match ReqwestScanApi::new(&config.api) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("error: {err}");
            return 2;
        }
    };
    hunter_info!("using backend at {}", api.base_url());

    // One-shot queries bypass the observer loop entirely.
    match command {
        Command::Schedules => return show_schedules(&api),
        Command::Settings => return show_settings(&api),
        _ => {}
    }

    let api_base = api.base_url().to_string();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(Arc::new(api), msg_tx.clone());

    match command {
        Command::Scan {
            query,
            location,
            radius,
            min_listings,
            intent,
        } => {
            let params = ScanParams {
                query,
                location,
                radius,
                min_listings,
                user_intent: intent,
            };
            spawn_tickers(&msg_tx, &config);
            observe(Msg::SubmitRequested { params }, runner, msg_rx, &api_base)
        }
        Command::Watch { scan_id } => {
            spawn_tickers(&msg_tx, &config);
            observe(Msg::JobSelected { scan_id }, runner, msg_rx, &api_base)
        }
        Command::Jobs => list_jobs(runner, msg_rx),
        Command::Delete { scan_id } => delete_scan(scan_id, runner, msg_rx),
        // Handled above.
        Command::Schedules | Command::Settings => 0,
    }
}

fn spawn_tickers(msg_tx: &Sender<Msg>, config: &AppConfig) {
    spawn_ticker(msg_tx.clone(), config.poll_interval, || Msg::PollTick);
    spawn_ticker(msg_tx.clone(), config.elapsed_interval, || Msg::ElapsedTick {
        now: Utc::now(),
    });
}

fn spawn_ticker(
    msg_tx: Sender<Msg>,
    interval: Duration,
    make: impl Fn() -> Msg + Send + 'static,
) {
    thread::spawn(move || loop {
        thread::sleep(interval);
        if msg_tx.send(make()).is_err() {
            break;
        }
    });
}

/// Drives a scan to completion, printing log output and progress as it
/// arrives. Returns the process exit code.
fn observe(initial: Msg, runner: EffectRunner, msg_rx: Receiver<Msg>, api_base: &str) -> i32 {
    let mut state = ObserverState::default();
    let mut tail = LogTail::default();
    let mut last_line = String::new();

    let (next, effects) = update(state, initial);
    state = next;
    if state.phase() == ObserverPhase::Idle {
        eprintln!("error: nothing to observe");
        return 2;
    }
    runner.enqueue(effects);

    while let Ok(msg) = msg_rx.recv() {
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if !state.consume_dirty() {
            continue;
        }
        let view = state.view();
        if let Some(fresh) = tail.advance(&view.log) {
            print!("{fresh}");
        }
        let line = render::status_line(&view);
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
        if view.settled {
            print!("{}", render::final_report(&view, api_base));
            return if view.phase == ObserverPhase::Failed { 1 } else { 0 };
        }
        // Submission or historical load fell over before a scan existed.
        if view.phase == ObserverPhase::Idle {
            if let Some(error) = &view.last_error {
                eprintln!("error: {error}");
            }
            return 1;
        }
    }
    1
}

fn list_jobs(runner: EffectRunner, msg_rx: Receiver<Msg>) -> i32 {
    let mut state = ObserverState::default();
    let (next, effects) = update(state, Msg::RefreshJobsRequested);
    state = next;
    runner.enqueue(effects);

    while let Ok(msg) = msg_rx.recv() {
        match msg {
            Msg::JobsFailed { error } => {
                eprintln!("error: {error}");
                return 1;
            }
            Msg::JobsArrived { .. } => {
                let (next, _) = update(state, msg);
                print!("{}", render::jobs_table(&next.view().jobs));
                return 0;
            }
            other => {
                let (next, effects) = update(state, other);
                state = next;
                runner.enqueue(effects);
            }
        }
    }
    1
}

fn delete_scan(scan_id: String, runner: EffectRunner, msg_rx: Receiver<Msg>) -> i32 {
    let mut state = ObserverState::default();
    let (next, effects) = update(state, Msg::DeleteRequested { scan_id });
    state = next;
    runner.enqueue(effects);

    while let Ok(msg) = msg_rx.recv() {
        match msg {
            Msg::DeleteCompleted { scan_id } => {
                println!("Deleted {scan_id}");
                return 0;
            }
            Msg::DeleteFailed { scan_id, error } => {
                eprintln!("error: delete {scan_id}: {error}");
                return 1;
            }
            other => {
                let (next, effects) = update(state, other);
                state = next;
                runner.enqueue(effects);
            }
        }
    }
    1
}

fn show_schedules(api: &ReqwestScanApi) -> i32 {
    with_runtime(|runtime| match runtime.block_on(api.list_schedules()) {
        Ok(schedules) if schedules.is_empty() => {
            println!("No schedules.");
            0
        }
        Ok(schedules) => {
            for schedule in schedules {
                let id = schedule.id.as_deref().unwrap_or("-");
                let active = if schedule.active { "active" } else { "paused" };
                println!(
                    "{:<12} {:<7} {:<6} {:<5} {:<12} {}",
                    id, active, schedule.frequency, schedule.time, schedule.location,
                    schedule.query
                );
            }
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    })
}

fn show_settings(api: &ReqwestScanApi) -> i32 {
    with_runtime(|runtime| match runtime.block_on(api.smtp_settings()) {
        Ok(settings) => {
            println!("smtp server:   {}:{}", settings.smtp_server, settings.smtp_port);
            println!("smtp user:     {}", settings.smtp_user);
            let password = if settings.smtp_password.is_empty() {
                "(unset)"
            } else {
                "(set)"
            };
            println!("smtp password: {password}");
            println!("default email: {}", settings.default_email);
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    })
}

fn with_runtime(run: impl FnOnce(&tokio::runtime::Runtime) -> i32) -> i32 {
    match tokio::runtime::Runtime::new() {
        Ok(runtime) => run(&runtime),
        Err(err) => {
            eprintln!("error: failed to start runtime: {err}");
            2
        }
    }
}
