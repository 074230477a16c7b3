use mock_service::MockConfig;
use reqwest::{Client, StatusCode};
use volley_tests::*;

#[tokio::test]
async fn health_reports_configured_status() {
    let client = Client::new();

    let healthy = target().await.unwrap();
    let res = client
        .get(format!("{}/health", healthy.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let degraded = target_with(MockConfig {
        health_status: 503,
        ..MockConfig::default()
    })
    .await
    .unwrap();
    let res = client
        .get(format!("{}/health", degraded.url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(degraded.hits(), 0);
}

#[tokio::test]
async fn login_issues_token_for_known_account() {
    let target = target().await.unwrap();
    let client = Client::new();
    let url = format!("{}/api/auth/login", target.url());

    let res = client
        .post(&url)
        .json(&serde_json::json!({ "email": ACCOUNT.0, "password": ACCOUNT.1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["token"], "mock-service-token");

    let res = client
        .post(&url)
        .json(&serde_json::json!({ "email": ACCOUNT.0, "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(target.logins(), 2);
}
