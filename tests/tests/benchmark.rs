use mock_service::MockConfig;
use std::num::NonZeroUsize;
use volley::core::Credentials;
use volley::prelude::*;
use volley::report::write_reports;
use volley_tests::*;

fn templates() -> Vec<ScenarioTemplate> {
    vec![
        ScenarioTemplate::post("Login", "/api/auth/login")
            .body(TemplateBody::Credentials)
            .anonymous(),
        ScenarioTemplate::get("Protected", "/protected"),
        ScenarioTemplate::get("Delayed", "/delay/ms/5"),
        ScenarioTemplate::get("Missing", "/status/404"),
        ScenarioTemplate::post("Echo", "/echo")
            .body(TemplateBody::Json(serde_json::json!({ "page": 1 }))),
    ]
}

fn config(url: String) -> BenchConfig {
    BenchConfig::new(url)
        .requests(20)
        .concurrency(NonZeroUsize::new(4).unwrap())
        .warmup(2)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn runs_every_scenario_in_order() {
    let target = target().await.unwrap();
    let bench = Benchmark::new(config(target.url()).credential(valid_credentials())).unwrap();

    let results = bench.run(&templates()).await.unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.scenario.as_str()).collect();
    assert_eq!(names, vec!["Login", "Protected", "Delayed", "Missing", "Echo"]);

    for result in &results {
        assert_eq!(result.requests, 20);
        assert_eq!(result.concurrency, 4);
        assert_eq!(result.success + result.errors, result.requests);
        assert!(result.rps > 0.);
        assert!(result.min_ms <= result.p50_ms);
        assert!(result.p50_ms <= result.p95_ms);
        assert!(result.p95_ms <= result.p99_ms);
        assert!(result.p99_ms <= result.max_ms);
    }

    let by_name = |name: &str| results.iter().find(|r| r.scenario == name).unwrap();
    assert_eq!(by_name("Login").statuses.to_string(), "200:20");
    assert_eq!(by_name("Protected").statuses.to_string(), "200:20");
    assert!(by_name("Delayed").min_ms >= 5.);
    assert_eq!(by_name("Missing").errors, 20);
    assert_eq!(by_name("Missing").error_rate_pct, 100.);
    assert_eq!(by_name("Missing").statuses.to_string(), "404:20");
    assert_eq!(by_name("Echo").success, 20);

    // Four workload scenarios, each with warmup plus the measured batch.
    assert_eq!(target.hits(), 4 * (20 + 2));
    // Preflight login plus the login scenario.
    assert_eq!(target.logins(), 1 + 20 + 2);
}

#[tokio::test]
async fn unhealthy_target_produces_no_results() {
    let target = target_with(MockConfig {
        health_status: 503,
        ..MockConfig::default()
    })
    .await
    .unwrap();
    let bench = Benchmark::new(config(target.url()).credential(valid_credentials())).unwrap();

    let err = bench.run(&templates()).await.unwrap_err();
    assert!(matches!(err, BenchError::HealthCheck(_)), "{err}");
    assert!(err.to_string().contains("503"), "{err}");
    assert_eq!(target.logins(), 0);
    assert_eq!(target.hits(), 0);
}

#[tokio::test]
async fn unreachable_target_fails_health_check() {
    let url = closed_port_url().await.unwrap();
    let bench = Benchmark::new(config(url).credential(valid_credentials())).unwrap();

    let err = bench.run(&templates()).await.unwrap_err();
    assert!(matches!(err, BenchError::HealthCheck(_)), "{err}");
    assert!(err.is_precondition());
}

#[tokio::test]
async fn falls_back_through_credentials() {
    let target = target().await.unwrap();
    let bench = Benchmark::new(
        config(target.url())
            .requests(2)
            .warmup(0)
            .credential(Credentials::new("nobody@volley.test", "wrong"))
            .credential(valid_credentials()),
    )
    .unwrap();

    let results = bench
        .run(&[ScenarioTemplate::get("Protected", "/protected")])
        .await
        .unwrap();

    assert_eq!(target.logins(), 2);
    assert_eq!(results[0].statuses.to_string(), "200:2");
}

#[tokio::test]
async fn no_working_credentials_is_fatal() {
    let target = target().await.unwrap();
    let bench = Benchmark::new(
        config(target.url())
            .credential(Credentials::new("nobody@volley.test", "wrong"))
            .credential(Credentials::new(ACCOUNT.0, "also-wrong")),
    )
    .unwrap();

    let err = bench.run(&templates()).await.unwrap_err();
    assert!(matches!(err, BenchError::Authentication { attempted: 2 }), "{err}");
    assert_eq!(target.hits(), 0);
}

#[tokio::test]
async fn results_are_written_as_reports() {
    let target = target().await.unwrap();
    let bench = Benchmark::new(
        config(target.url())
            .requests(3)
            .warmup(0)
            .credential(valid_credentials()),
    )
    .unwrap();
    let results = bench.run(&templates()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let paths = write_reports(dir.path(), &results).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.json).unwrap()).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(templates().len()));

    let csv = std::fs::read_to_string(&paths.csv).unwrap();
    assert_eq!(csv.lines().count(), 1 + templates().len());
    assert!(csv.starts_with("scenario,method,requests,"));
}
