use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hunter_client::{ApiCommand, ApiEvent, ApiHandle, ApiSettings, ReqwestScanApi};

#[test]
fn handle_round_trips_commands_and_echoes_tags() {
    // The handle owns its own runtime; the test only needs one to drive
    // the mock server setup.
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let server = runtime.block_on(MockServer::start());
    runtime.block_on(async {
        Mock::given(method("GET"))
            .and(path("/scan/abc123/log"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"log": "hello"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/jobs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jobs": []})))
            .mount(&server)
            .await;
    });

    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    let api = Arc::new(ReqwestScanApi::new(&settings).expect("client"));
    let (handle, events) = ApiHandle::new(api);

    handle.send(ApiCommand::FetchLog {
        tag: 7,
        scan_id: "abc123".to_string(),
    });
    match events.recv_timeout(Duration::from_secs(5)).expect("event") {
        ApiEvent::LogFinished {
            tag,
            scan_id,
            result,
        } => {
            assert_eq!(tag, 7);
            assert_eq!(scan_id, "abc123");
            assert_eq!(result.expect("log"), "hello");
        }
        other => panic!("unexpected event {other:?}"),
    }

    handle.send(ApiCommand::ListJobs);
    match events.recv_timeout(Duration::from_secs(5)).expect("event") {
        ApiEvent::JobsFinished { result } => assert!(result.expect("jobs").is_empty()),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn handle_reports_failures_as_events() {
    let settings = ApiSettings {
        // Nothing is listening here; the request fails fast.
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    };
    let api = Arc::new(ReqwestScanApi::new(&settings).expect("client"));
    let (handle, events) = ApiHandle::new(api);

    handle.send(ApiCommand::FetchStatus {
        tag: 3,
        scan_id: "abc123".to_string(),
    });
    match events.recv_timeout(Duration::from_secs(5)).expect("event") {
        ApiEvent::StatusFinished { tag, result, .. } => {
            assert_eq!(tag, 3);
            assert!(result.is_err());
        }
        other => panic!("unexpected event {other:?}"),
    }
}
