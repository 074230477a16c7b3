use std::time::Duration;
use volley::executor::{Executor, HttpExecutor};
use volley::core::{HttpMethod, RequestSpec};
use volley_tests::*;

fn request(method: HttpMethod, url: &str) -> RequestSpec {
    RequestSpec::new(method, url.parse().unwrap())
}

#[tokio::test]
async fn success_statuses_are_ok() {
    let target = target().await.unwrap();
    let executor = HttpExecutor::default();

    let sample = executor
        .execute(&request(HttpMethod::Get, &format!("{}/status/204", target.url())))
        .await;
    assert!(sample.ok());
    assert_eq!(sample.status(), 204);
    assert_eq!(sample.error(), None);
    assert!(sample.elapsed > Duration::ZERO);
}

#[tokio::test]
async fn error_statuses_keep_their_code() {
    let target = target().await.unwrap();
    let executor = HttpExecutor::default();

    for code in [400, 404, 500, 503] {
        let sample = executor
            .execute(&request(
                HttpMethod::Get,
                &format!("{}/status/{code}", target.url()),
            ))
            .await;
        assert!(!sample.ok());
        assert_eq!(sample.status(), code);
        assert_eq!(sample.error(), None, "a response was received for {code}");
    }
}

#[tokio::test]
async fn connection_failure_is_a_transport_sample() {
    let url = closed_port_url().await.unwrap();
    let executor = HttpExecutor::default();

    let sample = executor
        .execute(&request(HttpMethod::Get, &format!("{url}/health")))
        .await;
    assert!(!sample.ok());
    assert_eq!(sample.status(), 0);
    assert!(sample.error().is_some_and(|msg| !msg.is_empty()));
}

#[tokio::test]
async fn timeout_is_a_transport_sample() {
    let target = target().await.unwrap();
    let executor = HttpExecutor::new(Duration::from_millis(50));

    let sample = executor
        .execute(&request(
            HttpMethod::Get,
            &format!("{}/delay/ms/2000", target.url()),
        ))
        .await;
    assert!(!sample.ok());
    assert_eq!(sample.status(), 0);
    assert!(sample.error().is_some());
    assert!(sample.elapsed < Duration::from_millis(2000));
}

#[tokio::test]
async fn json_body_and_headers_are_sent() {
    let target = target().await.unwrap();
    let executor = HttpExecutor::default();

    let echo = request(HttpMethod::Post, &format!("{}/echo", target.url()))
        .json(serde_json::json!({ "patient": 7 }));
    assert!(executor.execute(&echo).await.ok());

    // No body means no JSON content type.
    let bare = request(HttpMethod::Post, &format!("{}/echo", target.url()));
    let sample = executor.execute(&bare).await;
    assert!(!sample.ok());
    assert!((400..500).contains(&sample.status()));

    let protected = request(HttpMethod::Get, &format!("{}/protected", target.url()));
    assert_eq!(executor.execute(&protected).await.status(), 401);

    let authorized = protected.header("Authorization", "Bearer mock-service-token");
    assert_eq!(executor.execute(&authorized).await.status(), 200);
}
