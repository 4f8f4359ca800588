use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hunter_client::{ApiError, ApiSettings, ReqwestScanApi, ScanApi, ScanRequest};

fn api_for(server: &MockServer) -> ReqwestScanApi {
    let settings = ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    };
    ReqwestScanApi::new(&settings).expect("client")
}

#[tokio::test]
async fn submit_scan_posts_params_and_returns_scan_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scan"))
        .and(body_partial_json(json!({
            "query": "Herman Miller Aeron",
            "location": "erskineville",
            "radius": 10,
            "min_listings": 30,
            "source": "manual",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Scan started",
            "scan_id": "abc123",
            "query": "Herman Miller Aeron",
            "location": "erskineville",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let request = ScanRequest {
        query: "Herman Miller Aeron".to_string(),
        ..ScanRequest::default()
    };
    let response = api.submit_scan(&request).await.expect("submit ok");
    assert_eq!(response.scan_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn scan_status_parses_stats_results_and_inventory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running",
            "stage": "ranked",
            "stats": {
                "total_duration_seconds": 73.2,
                "total_cost_usd": 0.0412,
                "total_tokens": {"input": 18000, "output": 2400},
                "start_time": "2024-11-03T09:30:00Z",
                "output_dir": "/app/data/screenshots_Aeron_20241103",
            },
            "results": [{
                "id": "listing-1",
                "title": "Aeron chair size B",
                "price": "$450",
                "url": "https://marketplace.example/listing-1",
                "screenshot": "listing-1.png",
                "deal_rating": 9,
                "verification": {"verified": true, "notes": "looks genuine", "score": 0.92},
            }],
            "inventory": [
                {"id": "listing-2", "title": "Office chair", "price": "$80", "url": "u2"},
                {"id": "listing-3", "title": "Aeron clone", "price": "$120", "url": "u3"},
            ],
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let status = api.scan_status("abc123").await.expect("status ok");

    assert_eq!(status.status, "running");
    assert_eq!(status.stage.as_deref(), Some("ranked"));
    let stats = status.stats.expect("stats");
    assert_eq!(stats.total_duration_seconds, Some(73.2));
    assert_eq!(stats.total_tokens.expect("tokens").input, 18000);
    assert_eq!(
        stats.output_dir.as_deref(),
        Some("/app/data/screenshots_Aeron_20241103")
    );

    let results = status.results.expect("results");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Aeron chair size B");
    assert_eq!(results[0].deal_rating, Some(9));
    assert!(results[0].verification.as_ref().expect("verification").verified);
    assert_eq!(status.inventory.expect("inventory").len(), 2);
}

#[tokio::test]
async fn scan_status_tolerates_sparse_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/young"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running",
            "stage": "initializing",
            "stats": null,
            "results": null,
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let status = api.scan_status("young").await.expect("status ok");
    assert!(status.stats.is_none());
    assert!(status.results.is_none());
    assert!(status.inventory.is_none());
}

#[tokio::test]
async fn in_band_not_found_status_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/gone"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "not_found",
            "stats": null,
            "results": null,
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.scan_status("gone").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn scan_log_returns_the_text_blob() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/abc123/log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "log": "Launching Scraper...\nScraper finished.\n",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let log = api.scan_log("abc123").await.expect("log ok");
    assert_eq!(log, "Launching Scraper...\nScraper finished.\n");
}

#[tokio::test]
async fn delete_scan_maps_http_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/scan/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Job not found",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.delete_scan("gone").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn delete_scan_returns_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/scan/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "deleted",
            "scan_id": "abc123",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let response = api.delete_scan("abc123").await.expect("delete ok");
    assert_eq!(response.status, "deleted");
    assert_eq!(response.scan_id.as_deref(), Some("abc123"));
}

#[tokio::test]
async fn list_jobs_unwraps_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [
                {
                    "scan_id": "j1",
                    "start_time": "2024-11-03T09:30:00Z",
                    "end_time": null,
                    "status": "running",
                    "query": "Aeron",
                    "location": "erskineville",
                    "source": "manual",
                },
                {
                    "scan_id": "j2",
                    "start_time": "2024-11-02T08:00:00Z",
                    "end_time": "2024-11-02T08:04:12Z",
                    "status": "complete",
                },
            ],
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let jobs = api.list_jobs().await.expect("jobs ok");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].scan_id, "j1");
    assert_eq!(jobs[0].query.as_deref(), Some("Aeron"));
    assert_eq!(jobs[1].status, "complete");
    assert!(jobs[1].query.is_none());
}

#[tokio::test]
async fn server_error_maps_to_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.list_jobs().await.unwrap_err();
    assert_eq!(err, ApiError::HttpStatus(500));
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scan/slow/log"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"log": "late"})),
        )
        .mount(&server)
        .await;

    let settings = ApiSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ApiSettings::default()
    };
    let api = ReqwestScanApi::new(&settings).expect("client");
    let err = api.scan_log("slow").await.unwrap_err();
    assert_eq!(err, ApiError::Timeout);
}

#[tokio::test]
async fn schedules_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/schedules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "schedules": [{
                "id": "s1",
                "query": "Aeron",
                "location": "sydney",
                "radius": 25,
                "min_listings": 20,
                "user_intent": "resell",
                "frequency": "daily",
                "time": "07:30",
                "email_to": "deals@example.com",
                "active": true,
                "last_run": "2024-11-01T07:30:00Z",
            }],
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/schedules"))
        .and(body_partial_json(json!({"query": "Aeron", "frequency": "daily"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/schedules/s1/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "started"})))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let schedules = api.list_schedules().await.expect("schedules ok");
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].time, "07:30");
    assert!(schedules[0].active);

    api.save_schedule(&schedules[0]).await.expect("save ok");
    api.run_schedule("s1").await.expect("run ok");
}

#[tokio::test]
async fn delete_schedule_hits_the_id_route() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/schedules/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "deleted"})))
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.delete_schedule("s1").await.expect("delete ok");
}

#[tokio::test]
async fn delete_schedule_maps_http_404_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/schedules/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "detail": "Schedule not found",
        })))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.delete_schedule("gone").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound);
}

#[tokio::test]
async fn health_probe_succeeds_on_ok_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
        .mount(&server)
        .await;

    let api = api_for(&server);
    api.health().await.expect("health ok");
}

#[tokio::test]
async fn health_probe_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let err = api.health().await.unwrap_err();
    assert_eq!(err, ApiError::HttpStatus(503));
}

#[tokio::test]
async fn smtp_settings_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "smtp_server": "smtp.example.com",
            "smtp_port": 587,
            "smtp_user": "hunter",
            "smtp_password": "secret",
            "default_email": "me@example.com",
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/settings"))
        .and(body_partial_json(json!({"smtp_server": "smtp.example.com"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "saved"})))
        .mount(&server)
        .await;

    let api = api_for(&server);
    let settings = api.smtp_settings().await.expect("settings ok");
    assert_eq!(settings.smtp_port, 587);
    api.save_smtp_settings(&settings).await.expect("save ok");
}
