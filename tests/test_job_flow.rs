mod common;

use common::*;
use minewatch::core::dashboard::Tone;
use serde_json::json;

#[tokio::test]
async fn test_job_runs_to_dashboard() -> anyhow::Result<()> {
    let backend = MockBackend::start(
        vec![running(10), running(55), done()],
        results_document(&[RIVER_ZONE]),
    )
    .await;
    let settings = test_settings(&backend.base_url, 50);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let mut seen = Vec::new();
    let results = runner
        .run(&legal_geojson(), &nogo_geojson(), |p| seen.push(p))
        .await?;

    assert!(!runner.is_in_flight());
    assert_eq!(seen, vec![10.0, 55.0, 100.0]);
    assert_eq!(backend.progress_calls(), 3);

    let submissions = backend.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0]["mine_geojson"], legal_geojson());
    assert_eq!(submissions[0]["no_go_geojson_list"], json!([nogo_geojson()]));

    let last = results.last_index().expect("three periods");
    let view = render(&DashboardInput::from_results(&results, Channel::Legal), last)
        .expect("last period renders");
    assert_eq!(view.slider_max, 2);
    assert_eq!(view.date, "2024-03");
    assert!((view.kpis.growth_pct - 10.0 / 3.0).abs() < 1e-9);
    assert_eq!(view.kpis.growth_tone, Tone::Good);
    assert_eq!(view.kpis.prediction, 16.2);
    assert!(view.violation);
    assert_eq!(view.audit_log[0].violated, view.violation);
    assert_eq!(view.audit_log.len(), 3);
    assert!(!view.audit_log[1].violated);
    assert_eq!(view.first_breach.as_deref(), Some("2024-03"));

    Ok(())
}

#[tokio::test]
async fn test_nogo_tab_reports_new_activity() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![done()], results_document(&[RIVER_ZONE])).await;
    let settings = test_settings(&backend.base_url, 5);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let results = runner.run(&legal_geojson(), &nogo_geojson(), |_| {}).await?;
    let view = render(&DashboardInput::from_results(&results, Channel::NoGo), 1)
        .expect("period 1 renders");

    assert_eq!(view.kpis.area_title, "Illegal Mining Area");
    assert_eq!(view.kpis.growth_pct, 100.0);
    assert_eq!(view.kpis.growth_tone, Tone::Alert);
    assert_eq!(view.kpis.prediction, 0.0031);
    assert!(!view.violation);
    assert_eq!(view.chart.labels, vec!["2024-01", "2024-02"]);
    assert_eq!(view.first_breach, None);

    Ok(())
}

#[tokio::test]
async fn test_backend_error_is_reported() -> anyhow::Result<()> {
    let backend = MockBackend::start(
        vec![running(20), failed("Earth Engine quota exceeded")],
        json!({}),
    )
    .await;
    let settings = test_settings(&backend.base_url, 50);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("job should fail");
    match err {
        JobError::Failed(message) => assert_eq!(message, "Earth Engine quota exceeded"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(!runner.is_in_flight());

    Ok(())
}

#[tokio::test]
async fn test_error_without_message_uses_default() -> anyhow::Result<()> {
    let backend = MockBackend::start(
        vec![json!({"progress": 0, "status": "error", "error": null})],
        json!({}),
    )
    .await;
    let settings = test_settings(&backend.base_url, 50);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("job should fail");
    assert_eq!(
        err.to_string(),
        minewatch::core::job::DEFAULT_FAILURE_MESSAGE
    );

    Ok(())
}

#[tokio::test]
async fn test_polling_gives_up_after_max_attempts() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![running(40)], json!({})).await;
    let settings = test_settings(&backend.base_url, 4);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("job should time out");
    assert!(matches!(err, JobError::TimedOut { attempts: 4 }));
    assert_eq!(backend.progress_calls(), 4);
    assert!(!runner.is_in_flight());

    Ok(())
}

#[tokio::test]
async fn test_submit_rejected_by_server() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![done()], json!({})).await;
    backend.with(|s| s.run_status = Some(axum::http::StatusCode::INTERNAL_SERVER_ERROR));
    let settings = test_settings(&backend.base_url, 5);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("submission should fail");
    match err {
        JobError::Submit(ApiError::Server { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "analysis worker unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.progress_calls(), 0);
    assert!(!runner.is_in_flight());

    Ok(())
}

#[tokio::test]
async fn test_submit_without_server() -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    drop(listener);

    let settings = test_settings(&base_url, 5);
    let client = ApiClient::new(&base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("nothing is listening");
    assert!(matches!(err, JobError::Submit(ApiError::Connection(_))));

    Ok(())
}

#[tokio::test]
async fn test_second_submit_is_rejected_while_running() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![running(5), done()], results_document(&[])).await;
    let settings = test_settings(&backend.base_url, 10);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    assert!(runner.is_in_flight());

    let err = runner
        .submit(&legal_geojson(), &nogo_geojson())
        .await
        .expect_err("second submit must be refused");
    assert!(matches!(err, JobError::AlreadyRunning));
    assert_eq!(backend.submissions().len(), 1);

    let results = runner.wait_for_results(|_| {}).await?;
    assert!(results.zones.is_empty());
    assert!(!runner.is_in_flight());

    // A finished job frees the runner for the next submission.
    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    assert_eq!(backend.submissions().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_malformed_progress_reply() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![json!({"progress": 12})], json!({})).await;
    let settings = test_settings(&backend.base_url, 5);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    let err = runner
        .run(&legal_geojson(), &nogo_geojson(), |_| {})
        .await
        .expect_err("reply without a status cannot be decoded");
    assert!(matches!(err, JobError::Progress(ApiError::Decode(_))));

    Ok(())
}

#[tokio::test]
async fn test_abandoned_wait_frees_the_runner() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![running(30)], results_document(&[])).await;
    let settings = test_settings(&backend.base_url, 100_000);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    let waited = tokio::time::timeout(
        std::time::Duration::from_millis(100),
        runner.wait_for_results(|_| {}),
    )
    .await;
    assert!(waited.is_err());
    assert!(!runner.is_in_flight());

    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    assert_eq!(backend.submissions().len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_cancel_after_submit() -> anyhow::Result<()> {
    let backend = MockBackend::start(vec![running(30)], results_document(&[])).await;
    let settings = test_settings(&backend.base_url, 10);
    let client = ApiClient::new(&backend.base_url, settings.request_timeout())?;
    let mut runner = JobRunner::new(client, backend.base_url.clone(), &settings);

    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    assert!(matches!(
        runner.submit(&legal_geojson(), &nogo_geojson()).await,
        Err(JobError::AlreadyRunning)
    ));

    runner.cancel();
    assert!(!runner.is_in_flight());
    runner.submit(&legal_geojson(), &nogo_geojson()).await?;
    assert_eq!(backend.submissions().len(), 2);
    assert_eq!(backend.progress_calls(), 0);

    Ok(())
}
