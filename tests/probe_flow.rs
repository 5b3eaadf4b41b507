use std::time::Duration;
use watchman::{probe::Prober, types::Outcome};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn server_with(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;
    server
}

fn prober(timeout: Option<Duration>) -> Prober {
    match Prober::new(timeout) {
        Ok(prober) => prober,
        Err(e) => panic!("client build failed: {e}"),
    }
}

#[tokio::test]
async fn success_keeps_body_and_empty_error() {
    let server = server_with(200, "all good").await;
    let outcome = prober(None)
        .probe(&format!("{}/health", server.uri()))
        .await;

    assert_eq!(
        outcome,
        Outcome::Success {
            body: "all good".into()
        }
    );
    assert_eq!(outcome.error(), "");
}

#[tokio::test]
async fn server_error_is_failure_with_body() {
    let server = server_with(500, "internal boom").await;
    let outcome = prober(None)
        .probe(&format!("{}/health", server.uri()))
        .await;

    assert!(outcome.is_failure());
    assert_eq!(outcome.body(), "internal boom");
    assert!(outcome.error().contains("500"));
}

#[tokio::test]
async fn client_error_is_failure() {
    let server = server_with(404, "").await;
    let outcome = prober(None)
        .probe(&format!("{}/health", server.uri()))
        .await;
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn timeout_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let outcome = prober(Some(Duration::from_millis(200)))
        .probe(&server.uri())
        .await;

    assert!(outcome.is_failure());
    assert_eq!(outcome.body(), "");
    assert!(!outcome.error().is_empty());
}

#[tokio::test]
async fn dns_failure_is_failure() {
    let outcome = prober(Some(Duration::from_secs(5)))
        .probe("http://watchman-does-not-exist.invalid/")
        .await;
    assert!(outcome.is_failure());
    assert!(!outcome.error().is_empty());
}

#[tokio::test]
async fn connection_refused_is_failure() {
    let port = match std::net::TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => match listener.local_addr() {
            Ok(addr) => addr.port(),
            Err(_) => return,
        },
        Err(_) => return,
    };

    let outcome = prober(None)
        .probe(&format!("http://127.0.0.1:{port}/"))
        .await;
    assert!(outcome.is_failure());
}

#[tokio::test]
async fn malformed_url_is_failure() {
    let outcome = prober(None).probe("not a url").await;
    assert!(outcome.is_failure());
}
